use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "docstore",
    about = "docstore: JSON documents over hierarchical file storage",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log every storage round trip
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file (defaults to ./docstore.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage root directory, overriding the configured backend
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List collections at the root or under a collection
    Collections(CollectionsArgs),
    /// Create a collection (and any missing parents)
    Mkcol(CollectionArgs),
    /// Remove a collection and everything in it
    Rmcol(CollectionArgs),
    /// List documents in a collection
    Docs(CollectionArgs),
    /// Print a document
    Get(DocumentArgs),
    /// Write a document, creating it if needed
    Put(PutArgs),
    /// Remove a document
    Rm(DocumentArgs),
}

#[derive(Args)]
pub struct CollectionsArgs {
    /// Collection path such as `org/users`; the root when omitted
    pub path: Option<String>,
}

#[derive(Args)]
pub struct CollectionArgs {
    pub path: String,
}

#[derive(Args)]
pub struct DocumentArgs {
    pub collection: String,
    pub name: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub collection: String,
    pub name: String,
    /// Document content as a JSON object
    pub json: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_put_with_global_flags() {
        let cli = Cli::try_parse_from([
            "docstore",
            "put",
            "users",
            "alice",
            r#"{"name":"Alice"}"#,
            "--root",
            "/tmp/data",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/data")));
        assert_eq!(cli.format, OutputFormat::Text);
        match cli.command {
            Command::Put(args) => {
                assert_eq!(args.collection, "users");
                assert_eq!(args.name, "alice");
            }
            _ => panic!("expected put"),
        }
    }

    #[test]
    fn collections_path_is_optional() {
        let cli = Cli::try_parse_from(["docstore", "collections", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Collections(CollectionsArgs { path: None })));
    }

    #[test]
    fn get_requires_a_name() {
        assert!(Cli::try_parse_from(["docstore", "get", "users"]).is_err());
    }
}
