//! A document database over hierarchical file storage.
//!
//! Directories are collections and JSON files are documents. Every call
//! translates to one operation on a [`StorageClient`]; nothing is cached,
//! and consistency between concurrent writers is left to the storage
//! service.
//!
//! # Handles
//!
//! - [`DocStore`] -- the root, anchored at `/`
//! - [`Collection`] -- one directory: lists, creates and removes children
//! - [`DocRef`] -- one `<name>.json` file: reads and writes a [`Document`]
//!
//! Handles hold only a path and a shared `Arc<dyn StorageClient>`, so they
//! are cheap to clone and safe to send between threads.
//!
//! ```
//! use std::sync::Arc;
//! use docstore::{DocStore, Document, InMemoryStorage};
//!
//! let store = DocStore::new(Arc::new(InMemoryStorage::new()));
//! let users = store.get_collection("users")?;
//! let mut alice = users.get_document("alice", true)?;
//!
//! let mut doc = Document::new();
//! doc.set_key("name", "Alice");
//! alice.set(&doc)?;
//! assert_eq!(alice.get()?, doc);
//! # Ok::<(), docstore::DocStoreError>(())
//! ```

pub mod collection;
pub mod docref;
pub mod document;
pub mod error;
pub mod path;
pub mod store;

pub use collection::Collection;
pub use docref::DocRef;
pub use document::Document;
pub use error::{DocStoreError, DocStoreResult};
pub use store::DocStore;

// Re-export the storage contract so callers need only one dependency.
pub use docstore_storage::{
    FileDescriptor, InMemoryStorage, LocalDirStorage, StorageClient, StorageError,
    StorageErrorKind,
};
