//! Hierarchical file storage for the docstore document database.
//!
//! The document layer never touches files directly. It talks to a
//! [`StorageClient`]: a small capability with list, stat, write, read, remove
//! and make-directory operations over slash-separated absolute paths. A
//! remote service, a local directory or an in-memory map can all sit behind
//! it.
//!
//! # Storage Backends
//!
//! - [`InMemoryStorage`] -- versioned, `BTreeMap`-based store for tests and embedding
//! - [`LocalDirStorage`] -- unversioned store rooted at a host directory
//!
//! # Design Rules
//!
//! 1. The root `/` always exists and cannot be removed.
//! 2. Missing paths are described, not errors: `file_status` reports
//!    `exists == false`.
//! 3. Error conditions callers branch on are exposed as
//!    [`StorageErrorKind`], never as message text.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod descriptor;
pub mod error;
mod local;
mod location;
pub mod memory;
pub mod options;
pub mod traits;

pub use descriptor::{content_hash, FileDescriptor};
pub use error::{StorageError, StorageErrorKind, StorageResult};
pub use local::LocalDirStorage;
pub use memory::InMemoryStorage;
pub use options::{RemoveOptions, WriteOptions};
pub use traits::StorageClient;
