/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Nothing exists at the given path.
    #[error("no such file or directory: {0}")]
    NotFound(String),

    /// A directory already exists at the path being created.
    #[error("directory already exists: {0}")]
    DirectoryExists(String),

    /// A directory operation hit a file.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// A file operation hit a directory.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// The file exists but the requested version does not.
    #[error("version {version} of {path} not found")]
    VersionNotFound { path: String, version: u64 },

    /// The path cannot be addressed by this backend.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend failure (network, permission, quota, conflict).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Matchable classification of a [`StorageError`].
///
/// Callers that need to treat one condition specially (for example
/// "directory already exists" during collection creation) match on the
/// kind instead of on message text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageErrorKind {
    NotFound,
    DirectoryExists,
    NotADirectory,
    IsADirectory,
    VersionNotFound,
    InvalidPath,
    Io,
    Backend,
}

impl StorageError {
    /// Classify this error.
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::NotFound(_) => StorageErrorKind::NotFound,
            Self::DirectoryExists(_) => StorageErrorKind::DirectoryExists,
            Self::NotADirectory(_) => StorageErrorKind::NotADirectory,
            Self::IsADirectory(_) => StorageErrorKind::IsADirectory,
            Self::VersionNotFound { .. } => StorageErrorKind::VersionNotFound,
            Self::InvalidPath(_) => StorageErrorKind::InvalidPath,
            Self::Io(_) => StorageErrorKind::Io,
            Self::Backend(_) => StorageErrorKind::Backend,
        }
    }

    /// Shorthand for `self.kind() == kind`.
    pub fn is(&self, kind: StorageErrorKind) -> bool {
        self.kind() == kind
    }
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            StorageError::DirectoryExists("/users".into()).kind(),
            StorageErrorKind::DirectoryExists
        );
        assert!(StorageError::NotFound("/x".into()).is(StorageErrorKind::NotFound));
        let io = StorageError::from(std::io::Error::other("disk on fire"));
        assert_eq!(io.kind(), StorageErrorKind::Io);
    }

    #[test]
    fn messages_name_the_path() {
        let err = StorageError::VersionNotFound {
            path: "/users/alice.json".into(),
            version: 7,
        };
        assert_eq!(err.to_string(), "version 7 of /users/alice.json not found");
    }
}
