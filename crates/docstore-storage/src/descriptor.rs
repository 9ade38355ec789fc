use serde::{Deserialize, Serialize};

/// Metadata the storage service reports for one path.
///
/// `directory` is the absolute path of the containing directory and `path` is
/// the entry name inside it, so a file at `/users/alice.json` has
/// `directory == "/users"` and `path == "alice.json"`. A descriptor for a
/// missing path still carries both, with `exists == false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Entry name within `directory`.
    pub path: String,
    /// Absolute path of the containing directory.
    pub directory: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
    /// Whether anything exists at the location.
    pub exists: bool,
    /// Latest version of a file. Zero for directories and missing entries.
    pub version: u64,
    /// Hex BLAKE3 hash of the file content. Empty for directories.
    pub hash: String,
    /// Content length in bytes.
    pub size: u64,
}

impl FileDescriptor {
    /// Descriptor for an existing file holding `data` at `version`.
    pub fn file(
        directory: impl Into<String>,
        name: impl Into<String>,
        version: u64,
        data: &[u8],
    ) -> Self {
        Self {
            path: name.into(),
            directory: directory.into(),
            is_directory: false,
            exists: true,
            version,
            hash: content_hash(data),
            size: data.len() as u64,
        }
    }

    /// Descriptor for an existing directory.
    pub fn directory(directory: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: name.into(),
            directory: directory.into(),
            is_directory: true,
            exists: true,
            ..Default::default()
        }
    }

    /// Descriptor for a location with nothing in it.
    pub fn missing(directory: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: name.into(),
            directory: directory.into(),
            ..Default::default()
        }
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Absolute path of the entry itself (`directory` joined with `path`).
    pub fn full_path(&self) -> String {
        let segments: Vec<&str> = self
            .directory
            .split('/')
            .chain(self.path.split('/'))
            .filter(|s| !s.is_empty())
            .collect();
        format!("/{}", segments.join("/"))
    }
}

/// Hex-encoded BLAKE3 hash of `data`.
pub fn content_hash(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}
