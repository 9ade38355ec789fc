use std::sync::Arc;

use docstore_storage::{FileDescriptor, RemoveOptions, StorageClient, WriteOptions};
use tracing::debug;

use crate::collection::Collection;
use crate::document::Document;
use crate::error::{DocStoreError, DocStoreResult};
use crate::path;

/// Handle to one document location in storage.
///
/// A `DocRef` holds the document's path, the descriptor storage reported for
/// it and the shared client. It never holds content: [`get`](Self::get) and
/// [`set`](Self::set) each make one round trip.
#[derive(Clone)]
pub struct DocRef {
    /// Storage segments, the last one being the file name with extension.
    path: Vec<String>,
    client: Arc<dyn StorageClient>,
    file: FileDescriptor,
}

impl DocRef {
    /// Wrap a file descriptor. Directory descriptors are rejected.
    pub(crate) fn new(
        file: FileDescriptor,
        client: Arc<dyn StorageClient>,
    ) -> DocStoreResult<Self> {
        let full_path = file.full_path();
        if file.is_directory {
            return Err(DocStoreError::InvalidLocation {
                path: full_path,
                reason: "cannot create a document reference from a directory".into(),
            });
        }
        let path = path::split(&full_path);
        if path.is_empty() {
            return Err(DocStoreError::InvalidLocation {
                path: full_path,
                reason: "the store root is not a document".into(),
            });
        }
        Ok(Self { path, client, file })
    }

    /// Read and decode the document at the version this handle knows about.
    pub fn get(&self) -> DocStoreResult<Document> {
        let file_path = self.file_path();
        debug!(path = %file_path, version = self.file.version, "reading document");
        let data = self
            .client
            .read_file(&file_path, self.file.version)
            .map_err(DocStoreError::storage("read document", &file_path))?;
        Ok(Document::from_bytes(&data)?.with_name(self.name()))
    }

    /// Encode `doc` and write it as the document's new content.
    ///
    /// The descriptor returned by storage replaces the one held here, so a
    /// following [`get`](Self::get) reads what was just written.
    pub fn set(&mut self, doc: &Document) -> DocStoreResult<()> {
        let data = doc.to_json()?;
        let file_path = self.file_path();
        let file = self
            .client
            .write_file(&data, &file_path, &WriteOptions::overwrite())
            .map_err(DocStoreError::storage("write document", &file_path))?;
        debug!(path = %file_path, version = file.version, "document written");
        self.file = file;
        Ok(())
    }

    /// Remove the document file. Removing a document that is already gone
    /// fails with the storage error.
    pub fn remove(&self) -> DocStoreResult<()> {
        let file_path = self.file_path();
        self.client
            .remove_file(&file_path, self.file.version, &RemoveOptions::file())
            .map_err(DocStoreError::storage("remove document", &file_path))?;
        debug!(path = %file_path, version = self.file.version, "document removed");
        Ok(())
    }

    /// Existence as last reported by storage. Not re-queried.
    pub fn exists(&self) -> bool {
        self.file.exists()
    }

    /// The collection holding this document.
    pub fn parent(&self) -> Collection {
        let parent = self.path[..self.path.len() - 1].to_vec();
        Collection::new(Arc::clone(&self.client), parent)
    }

    /// Document name, without the file extension.
    pub fn name(&self) -> &str {
        // `new` guarantees at least one segment.
        path::strip_extension(self.path.last().map(String::as_str).unwrap_or_default())
    }

    /// Logical path of the document, without the file extension.
    pub fn path(&self) -> String {
        let mut segments: Vec<&str> = self.path.iter().map(String::as_str).collect();
        if let Some(last) = segments.last_mut() {
            *last = path::strip_extension(*last);
        }
        path::join(&segments)
    }

    /// Storage path of the document file.
    pub fn file_path(&self) -> String {
        path::join(&self.path)
    }

    pub fn descriptor(&self) -> &FileDescriptor {
        &self.file
    }
}

impl std::fmt::Debug for DocRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocRef")
            .field("path", &self.file_path())
            .field("version", &self.file.version)
            .field("exists", &self.file.exists)
            .finish()
    }
}
