use anyhow::Context;
use colored::Colorize;
use docstore::{Collection, DocStore, Document};
use serde_json::json;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli, config: CliConfig) -> anyhow::Result<()> {
    let config = config.with_root(cli.root);
    let store = DocStore::new(config.open_backend()?);
    let format = cli.format;

    match cli.command {
        Command::Collections(args) => cmd_collections(&store, args, &format),
        Command::Mkcol(args) => cmd_mkcol(&store, args),
        Command::Rmcol(args) => cmd_rmcol(&store, args),
        Command::Docs(args) => cmd_docs(&store, args, &format),
        Command::Get(args) => cmd_get(&store, args),
        Command::Put(args) => cmd_put(&store, args),
        Command::Rm(args) => cmd_rm(&store, args),
    }
}

fn cmd_collections(
    store: &DocStore,
    args: CollectionsArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let collections = match args.path {
        Some(path) => store.collection_at(&path)?.list_collections()?,
        None => store.list_collections()?,
    };
    let paths: Vec<String> = collections.iter().map(Collection::path).collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&paths)?),
        OutputFormat::Text if paths.is_empty() => println!("No collections."),
        OutputFormat::Text => {
            for path in &paths {
                println!("  {}", path.cyan());
            }
        }
    }
    Ok(())
}

fn cmd_mkcol(store: &DocStore, args: CollectionArgs) -> anyhow::Result<()> {
    let collection = store.collection(&args.path)?;
    println!("{} Collection {}", "✓".green().bold(), collection.path().bold());
    Ok(())
}

fn cmd_rmcol(store: &DocStore, args: CollectionArgs) -> anyhow::Result<()> {
    store.remove_collection(&args.path)?;
    println!("{} Removed collection {}", "✓".green().bold(), args.path.bold());
    Ok(())
}

fn cmd_docs(store: &DocStore, args: CollectionArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let docs = store.collection_at(&args.path)?.list_documents()?;

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = docs
                .iter()
                .map(|d| {
                    json!({
                        "name": d.name(),
                        "path": d.path(),
                        "version": d.descriptor().version,
                        "hash": d.descriptor().hash,
                        "size": d.descriptor().size,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text if docs.is_empty() => println!("No documents."),
        OutputFormat::Text => {
            for doc in &docs {
                let desc = doc.descriptor();
                let short_hash = desc.hash.get(..8).unwrap_or(&desc.hash);
                println!(
                    "  {}  {}  {} bytes  v{}",
                    doc.name().yellow(),
                    short_hash.dimmed(),
                    desc.size,
                    desc.version
                );
            }
        }
    }
    Ok(())
}

fn cmd_get(store: &DocStore, args: DocumentArgs) -> anyhow::Result<()> {
    let doc = store
        .collection_at(&args.collection)?
        .get_document(&args.name, false)?
        .get()?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn cmd_put(store: &DocStore, args: PutArgs) -> anyhow::Result<()> {
    let content = Document::from_bytes(args.json.as_bytes())
        .context("document content must be a JSON object")?;
    let mut doc = store
        .collection(&args.collection)?
        .get_document(&args.name, true)?;
    doc.set(&content)?;
    tracing::info!(path = %doc.path(), version = doc.descriptor().version, "document stored");
    println!(
        "{} Wrote {} ({} keys)",
        "✓".green().bold(),
        doc.path().bold(),
        content.len()
    );
    Ok(())
}

fn cmd_rm(store: &DocStore, args: DocumentArgs) -> anyhow::Result<()> {
    store
        .collection_at(&args.collection)?
        .remove_document(&args.name)?;
    println!("{} Removed {}/{}", "✓".green().bold(), args.collection, args.name.bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    fn run(root: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["docstore", "--root", root.to_str().unwrap()];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap(), CliConfig::default())
    }

    #[test]
    fn put_writes_a_json_file() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["put", "users", "alice", r#"{"name":"Alice"}"#]).unwrap();

        let raw = std::fs::read(dir.path().join("users").join("alice.json")).unwrap();
        let doc = Document::from_bytes(&raw).unwrap();
        assert_eq!(doc.get_key("name"), Some(&json!("Alice")));

        run(dir.path(), &["get", "users", "alice"]).unwrap();
        run(dir.path(), &["docs", "users", "--format", "json"]).unwrap();
    }

    #[test]
    fn put_rejects_non_object_content() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path(), &["put", "users", "alice", "[1,2]"]).is_err());
        assert!(!dir.path().join("users").join("alice.json").exists());
    }

    #[test]
    fn get_missing_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), &["get", "users", "ghost"]).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn read_commands_do_not_create_collections() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path(), &["get", "nosuch", "ghost"]).is_err());
        assert!(run(dir.path(), &["rm", "nosuch", "ghost"]).is_err());
        assert!(run(dir.path(), &["docs", "nosuch"]).is_err());
        assert!(run(dir.path(), &["collections", "nosuch/deeper"]).is_err());
        assert!(!dir.path().join("nosuch").exists());
    }

    #[test]
    fn relative_collection_paths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["put", "users", "alice", "{}"]).unwrap();
        assert!(run(dir.path(), &["rmcol", "users/.."]).is_err());
        assert!(run(dir.path(), &["rmcol", "."]).is_err());
        assert!(dir.path().join("users").join("alice.json").is_file());
    }

    #[test]
    fn collection_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["mkcol", "org/users"]).unwrap();
        assert!(dir.path().join("org").join("users").is_dir());
        run(dir.path(), &["collections", "org"]).unwrap();

        run(dir.path(), &["rmcol", "org/users"]).unwrap();
        assert!(!dir.path().join("org").join("users").exists());
        run(dir.path(), &["rmcol", "org/users"]).unwrap();
    }

    #[test]
    fn rm_removes_document() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["put", "users", "bob", "{}"]).unwrap();
        run(dir.path(), &["rm", "users", "bob"]).unwrap();
        assert!(!dir.path().join("users").join("bob.json").exists());
        assert!(run(dir.path(), &["rm", "users", "bob"]).is_err());
    }
}
