use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::descriptor::FileDescriptor;
use crate::error::{StorageError, StorageResult};
use crate::location::Location;
use crate::options::{RemoveOptions, WriteOptions};
use crate::traits::StorageClient;

/// The only version an unversioned backend ever reports for a file.
const LOCAL_VERSION: u64 = 1;

/// Storage backed by a directory on the local filesystem.
///
/// Storage paths are resolved below `root`; `..` segments are rejected so
/// nothing outside the root is reachable. The local filesystem keeps no
/// history, so every existing file reports version 1, reads and removals
/// accept version 0 or 1, and `WriteOptions::keep_previous` is ignored.
#[derive(Clone, Debug)]
pub struct LocalDirStorage {
    root: PathBuf,
}

impl LocalDirStorage {
    /// Open storage rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        if !root.is_dir() {
            return Err(StorageError::NotADirectory(root.display().to_string()));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn host_path(&self, loc: &Location) -> PathBuf {
        let mut host = self.root.clone();
        host.extend(loc.segments());
        host
    }

    fn check_version(loc: &Location, version: u64) -> StorageResult<()> {
        if version == 0 || version == LOCAL_VERSION {
            Ok(())
        } else {
            Err(StorageError::VersionNotFound {
                path: loc.key(),
                version,
            })
        }
    }

    fn describe(&self, loc: &Location, host: &Path) -> StorageResult<FileDescriptor> {
        let directory = loc.parent().key();
        match fs::metadata(host) {
            Ok(meta) if meta.is_dir() => Ok(FileDescriptor::directory(directory, loc.name())),
            Ok(_) => {
                let data = fs::read(host).map_err(|e| map_io(e, loc))?;
                Ok(FileDescriptor::file(directory, loc.name(), LOCAL_VERSION, &data))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Ok(FileDescriptor::missing(directory, loc.name()))
            }
            Err(e) => Err(map_io(e, loc)),
        }
    }
}

/// Translate an I/O error into the storage taxonomy, naming the storage path.
fn map_io(err: io::Error, loc: &Location) -> StorageError {
    match err.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound(loc.key()),
        _ => StorageError::Io(err),
    }
}

impl StorageClient for LocalDirStorage {
    fn list_files(&self, path: &str) -> StorageResult<Vec<FileDescriptor>> {
        let loc = Location::parse(path)?;
        let host = self.host_path(&loc);
        if host.is_file() {
            return Err(StorageError::NotADirectory(loc.key()));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&host).map_err(|e| map_io(e, &loc))? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!(path = %loc.key(), name = ?raw, "skipping non-UTF-8 entry"),
            }
        }
        names.sort();

        names
            .into_iter()
            .map(|name| {
                let child = Location::parse(&format!("{}/{}", loc.key(), name))?;
                let child_host = host.join(&name);
                self.describe(&child, &child_host)
            })
            .collect()
    }

    fn file_status(&self, path: &str) -> StorageResult<FileDescriptor> {
        let loc = Location::parse(path)?;
        self.describe(&loc, &self.host_path(&loc))
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
        let host = self.host_path(&loc);
        if host.is_dir() {
            return Err(StorageError::IsADirectory(loc.key()));
        }

        let parent = loc.parent();
        let parent_host = self.host_path(&parent);
        if parent_host.is_file() {
            return Err(StorageError::NotADirectory(parent.key()));
        }
        if !parent_host.exists() {
            if !options.create_folders {
                return Err(StorageError::NotFound(parent.key()));
            }
            fs::create_dir_all(&parent_host).map_err(|e| map_io(e, &parent))?;
        }

        fs::write(&host, data).map_err(|e| map_io(e, &loc))?;
        debug!(path = %loc.key(), len = data.len(), "file written");
        Ok(FileDescriptor::file(parent.key(), loc.name(), LOCAL_VERSION, data))
    }

    fn read_file(&self, path: &str, version: u64) -> StorageResult<Vec<u8>> {
        let loc = Location::parse(path)?;
        let host = self.host_path(&loc);
        if host.is_dir() {
            return Err(StorageError::IsADirectory(loc.key()));
        }
        let data = fs::read(&host).map_err(|e| map_io(e, &loc))?;
        Self::check_version(&loc, version)?;
        Ok(data)
    }

    fn remove_file(&self, path: &str, version: u64, options: &RemoveOptions) -> StorageResult<()> {
        let loc = Location::parse(path)?;
        if loc.is_root() {
            return Err(StorageError::InvalidPath(loc.key()));
        }
        let host = self.host_path(&loc);
        if !host.exists() {
            return Err(StorageError::NotFound(loc.key()));
        }

        if options.directory {
            if !host.is_dir() {
                return Err(StorageError::NotADirectory(loc.key()));
            }
            fs::remove_dir_all(&host).map_err(|e| map_io(e, &loc))?;
            debug!(path = %loc.key(), "directory removed");
        } else {
            if host.is_dir() {
                return Err(StorageError::IsADirectory(loc.key()));
            }
            Self::check_version(&loc, version)?;
            fs::remove_file(&host).map_err(|e| map_io(e, &loc))?;
            debug!(path = %loc.key(), "file removed");
        }
        Ok(())
    }

    fn make_directory(&self, path: &str) -> StorageResult<()> {
        let loc = Location::parse(path)?;
        let host = self.host_path(&loc);
        if host.is_dir() {
            return Err(StorageError::DirectoryExists(loc.key()));
        }
        if host.exists() {
            return Err(StorageError::NotADirectory(loc.key()));
        }
        fs::create_dir_all(&host).map_err(|e| map_io(e, &loc))?;
        debug!(path = %loc.key(), "directory created");
        Ok(())
    }
}
