use crate::descriptor::FileDescriptor;
use crate::error::StorageResult;
use crate::options::{RemoveOptions, WriteOptions};

/// Hierarchical file storage.
///
/// Paths are slash-separated and absolute (`/users/alice.json`); `/` is the
/// root directory, which always exists. All implementations must satisfy
/// these invariants:
/// - `file_status` on a missing path succeeds with `exists == false`.
/// - `make_directory` on an existing directory fails with
///   [`StorageError::DirectoryExists`](crate::StorageError::DirectoryExists).
/// - Version `0` means "latest" for reads and "every version" for removal.
/// - All backend errors are propagated, never silently ignored.
pub trait StorageClient: Send + Sync {
    /// List the immediate children of the directory at `path`.
    fn list_files(&self, path: &str) -> StorageResult<Vec<FileDescriptor>>;

    /// Describe whatever is at `path`.
    fn file_status(&self, path: &str) -> StorageResult<FileDescriptor>;

    /// Write `data` as a new version of the file at `path` and describe it.
    fn write_file(
        &self,
        data: &[u8],
        path: &str,
        options: &WriteOptions,
    ) -> StorageResult<FileDescriptor>;

    /// Read the bytes of `version` of the file at `path`.
    fn read_file(&self, path: &str, version: u64) -> StorageResult<Vec<u8>>;

    /// Remove the file (or, with [`RemoveOptions::directory`], the directory
    /// tree) at `path`.
    fn remove_file(&self, path: &str, version: u64, options: &RemoveOptions) -> StorageResult<()>;

    /// Create the directory at `path`, including missing ancestors.
    fn make_directory(&self, path: &str) -> StorageResult<()>;
}
