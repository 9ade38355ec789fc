use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::descriptor::FileDescriptor;
use crate::error::{StorageError, StorageResult};
use crate::location::Location;
use crate::options::{RemoveOptions, WriteOptions};
use crate::traits::StorageClient;

/// One stored version of a file.
#[derive(Clone, Debug)]
struct FileVersion {
    version: u64,
    data: Vec<u8>,
}

#[derive(Clone, Debug)]
enum Node {
    Directory,
    /// Versions in ascending order; never empty.
    File(Vec<FileVersion>),
}

/// In-memory, versioned hierarchical storage.
///
/// Intended for tests and embedding. Every path lives in a `BTreeMap` keyed
/// by its canonical form behind a `RwLock`. Each write creates a new version
/// numbered one above the latest; the first write of a file is version 1.
pub struct InMemoryStorage {
    nodes: RwLock<BTreeMap<String, Node>>,
}

impl InMemoryStorage {
    /// Create storage holding only the root directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Directory);
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// Number of files currently stored (directories excluded).
    pub fn file_count(&self) -> usize {
        self.read_nodes()
            .map(|nodes| nodes.values().filter(|n| matches!(n, Node::File(_))).count())
            .unwrap_or(0)
    }

    /// Sorted canonical paths of every file and directory except the root.
    pub fn paths(&self) -> Vec<String> {
        self.read_nodes()
            .map(|nodes| nodes.keys().filter(|k| k.as_str() != "/").cloned().collect())
            .unwrap_or_default()
    }

    /// Versions currently retained for the file at `path`.
    pub fn versions(&self, path: &str) -> StorageResult<Vec<u64>> {
        let loc = Location::parse(path)?;
        let nodes = self.read_nodes()?;
        match nodes.get(&loc.key()) {
            Some(Node::File(versions)) => Ok(versions.iter().map(|v| v.version).collect()),
            Some(Node::Directory) => Err(StorageError::IsADirectory(loc.key())),
            None => Err(StorageError::NotFound(loc.key())),
        }
    }

    fn read_nodes(&self) -> StorageResult<RwLockReadGuard<'_, BTreeMap<String, Node>>> {
        self.nodes
            .read()
            .map_err(|e| StorageError::Backend(format!("lock poisoned: {e}")))
    }

    fn write_nodes(&self) -> StorageResult<RwLockWriteGuard<'_, BTreeMap<String, Node>>> {
        self.nodes
            .write()
            .map_err(|e| StorageError::Backend(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(loc: &Location, node: &Node) -> FileDescriptor {
    let directory = loc.parent().key();
    match node {
        Node::Directory => FileDescriptor::directory(directory, loc.name()),
        Node::File(versions) => {
            // Non-empty by construction.
            let latest = &versions[versions.len() - 1];
            FileDescriptor::file(directory, loc.name(), latest.version, &latest.data)
        }
    }
}

/// Create every missing ancestor of `loc` as a directory.
fn create_ancestors(nodes: &mut BTreeMap<String, Node>, loc: &Location) -> StorageResult<()> {
    for ancestor in loc.ancestors() {
        let key = ancestor.key();
        match nodes.get(&key) {
            Some(Node::Directory) => {}
            Some(Node::File(_)) => return Err(StorageError::NotADirectory(key)),
            None => {
                nodes.insert(key, Node::Directory);
            }
        }
    }
    Ok(())
}

impl StorageClient for InMemoryStorage {
    fn list_files(&self, path: &str) -> StorageResult<Vec<FileDescriptor>> {
        let loc = Location::parse(path)?;
        let key = loc.key();
        let nodes = self.read_nodes()?;
        match nodes.get(&key) {
            Some(Node::Directory) => {}
            Some(Node::File(_)) => return Err(StorageError::NotADirectory(key)),
            None => return Err(StorageError::NotFound(key)),
        }

        let depth = loc.segments().len() + 1;
        let mut entries = Vec::new();
        for (child_key, node) in nodes.iter() {
            let child = Location::parse(child_key)?;
            if child.segments().len() == depth && child.parent() == loc {
                entries.push(describe(&child, node));
            }
        }
        Ok(entries)
    }

    fn file_status(&self, path: &str) -> StorageResult<FileDescriptor> {
        let loc = Location::parse(path)?;
        let nodes = self.read_nodes()?;
        Ok(match nodes.get(&loc.key()) {
            Some(node) => describe(&loc, node),
            None => FileDescriptor::missing(loc.parent().key(), loc.name()),
        })
    }

    fn write_file(
        &self,
        data: &[u8],
        path: &str,
        options: &WriteOptions,
    ) -> StorageResult<FileDescriptor> {
        let loc = Location::parse(path)?;
        if loc.is_root() {
            return Err(StorageError::IsADirectory(loc.key()));
        }
        let key = loc.key();
        let mut nodes = self.write_nodes()?;

        let parent_key = loc.parent().key();
        let parent_is_dir = nodes.get(&parent_key).map(|n| matches!(n, Node::Directory));
        match parent_is_dir {
            Some(true) => {}
            Some(false) => return Err(StorageError::NotADirectory(parent_key)),
            None if options.create_folders => create_ancestors(&mut nodes, &loc)?,
            None => return Err(StorageError::NotFound(parent_key)),
        }

        let version = match nodes.get_mut(&key) {
            Some(Node::Directory) => return Err(StorageError::IsADirectory(key)),
            Some(Node::File(versions)) => {
                let next = versions.last().map(|v| v.version).unwrap_or(0) + 1;
                let entry = FileVersion {
                    version: next,
                    data: data.to_vec(),
                };
                if options.keep_previous {
                    versions.push(entry);
                } else {
                    *versions = vec![entry];
                }
                next
            }
            None => {
                nodes.insert(
                    key.clone(),
                    Node::File(vec![FileVersion {
                        version: 1,
                        data: data.to_vec(),
                    }]),
                );
                1
            }
        };

        debug!(path = %key, version, len = data.len(), "file written");
        Ok(FileDescriptor::file(parent_key, loc.name(), version, data))
    }

    fn read_file(&self, path: &str, version: u64) -> StorageResult<Vec<u8>> {
        let loc = Location::parse(path)?;
        let key = loc.key();
        let nodes = self.read_nodes()?;
        let versions = match nodes.get(&key) {
            Some(Node::File(versions)) => versions,
            Some(Node::Directory) => return Err(StorageError::IsADirectory(key)),
            None => return Err(StorageError::NotFound(key)),
        };

        let found = if version == 0 {
            versions.last()
        } else {
            versions.iter().find(|v| v.version == version)
        };
        found
            .map(|v| v.data.clone())
            .ok_or(StorageError::VersionNotFound { path: key, version })
    }

    fn remove_file(&self, path: &str, version: u64, options: &RemoveOptions) -> StorageResult<()> {
        let loc = Location::parse(path)?;
        let key = loc.key();
        if loc.is_root() {
            return Err(StorageError::InvalidPath(key));
        }
        let mut nodes = self.write_nodes()?;

        if options.directory {
            match nodes.get(&key) {
                Some(Node::Directory) => {}
                Some(Node::File(_)) => return Err(StorageError::NotADirectory(key)),
                None => return Err(StorageError::NotFound(key)),
            }
            let prefix = format!("{key}/");
            nodes.retain(|k, _| k != &key && !k.starts_with(&prefix));
            debug!(path = %key, "directory removed");
            return Ok(());
        }

        let versions = match nodes.get_mut(&key) {
            Some(Node::File(versions)) => versions,
            Some(Node::Directory) => return Err(StorageError::IsADirectory(key)),
            None => return Err(StorageError::NotFound(key)),
        };
        if version == 0 {
            versions.clear();
        } else {
            let before = versions.len();
            versions.retain(|v| v.version != version);
            if versions.len() == before {
                return Err(StorageError::VersionNotFound { path: key, version });
            }
        }
        if versions.is_empty() {
            nodes.remove(&key);
        }
        debug!(path = %key, version, "file removed");
        Ok(())
    }

    fn make_directory(&self, path: &str) -> StorageResult<()> {
        let loc = Location::parse(path)?;
        let key = loc.key();
        let mut nodes = self.write_nodes()?;
        match nodes.get(&key) {
            Some(Node::Directory) => return Err(StorageError::DirectoryExists(key)),
            Some(Node::File(_)) => return Err(StorageError::NotADirectory(key)),
            None => {}
        }
        create_ancestors(&mut nodes, &loc)?;
        nodes.insert(key.clone(), Node::Directory);
        debug!(path = %key, "directory created");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorage")
            .field("file_count", &self.file_count())
            .finish()
    }
}
