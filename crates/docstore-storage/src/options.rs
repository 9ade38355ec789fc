use serde::{Deserialize, Serialize};

/// Options for [`StorageClient::write_file`](crate::StorageClient::write_file).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Create missing parent directories instead of failing.
    pub create_folders: bool,
    /// Keep earlier versions readable after the write. Backends without
    /// versioning ignore this.
    pub keep_previous: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            create_folders: true,
            keep_previous: true,
        }
    }
}

impl WriteOptions {
    /// Replace the file content, discarding earlier versions.
    pub fn overwrite() -> Self {
        Self {
            keep_previous: false,
            ..Default::default()
        }
    }
}

/// Options for [`StorageClient::remove_file`](crate::StorageClient::remove_file).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOptions {
    /// Remove a directory and everything below it. When unset the target
    /// must be a file.
    pub directory: bool,
}

impl RemoveOptions {
    pub fn file() -> Self {
        Self { directory: false }
    }

    pub fn directory() -> Self {
        Self { directory: true }
    }
}
