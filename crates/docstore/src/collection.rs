use std::sync::Arc;

use docstore_storage::{RemoveOptions, StorageClient, StorageErrorKind, WriteOptions};
use tracing::debug;

use crate::docref::DocRef;
use crate::error::{DocStoreError, DocStoreResult};
use crate::path;

/// Handle to one directory in storage.
///
/// A collection holds documents (`<name>.json` files) and sub-collections
/// (directories). Nothing about its children is cached; every listing goes
/// to storage.
#[derive(Clone)]
pub struct Collection {
    client: Arc<dyn StorageClient>,
    path: Vec<String>,
}

impl Collection {
    pub(crate) fn new(client: Arc<dyn StorageClient>, path: Vec<String>) -> Self {
        Self { client, path }
    }

    /// References to every document directly inside this collection.
    pub fn list_documents(&self) -> DocStoreResult<Vec<DocRef>> {
        let dir = self.path();
        let files = self
            .client
            .list_files(&dir)
            .map_err(DocStoreError::storage("list documents in", &dir))?;
        debug!(path = %dir, entries = files.len(), "listed collection");

        files
            .into_iter()
            .filter(|file| !file.is_directory)
            .map(|file| DocRef::new(file, Arc::clone(&self.client)))
            .collect()
    }

    /// Every sub-collection directly inside this collection.
    pub fn list_collections(&self) -> DocStoreResult<Vec<Collection>> {
        let dir = self.path();
        let files = self
            .client
            .list_files(&dir)
            .map_err(DocStoreError::storage("list collections in", &dir))?;
        debug!(path = %dir, entries = files.len(), "listed collection");

        Ok(files
            .into_iter()
            .filter(|file| file.is_directory)
            .map(|file| Collection::new(Arc::clone(&self.client), path::split(&file.full_path())))
            .collect())
    }

    /// Reference to the document `name` in this collection.
    ///
    /// If the document does not exist this fails with
    /// [`DocStoreError::NotFound`] unless `allow_create` is set, in which case
    /// an empty document is written first.
    pub fn get_document(&self, name: &str, allow_create: bool) -> DocStoreResult<DocRef> {
        let name = path::document_name(name)
            .map_err(|reason| self.invalid(name, reason))?;
        let mut segments = self.path.clone();
        segments.push(path::add_extension(name));
        let file_path = path::join(&segments);
        let file = self
            .client
            .file_status(&file_path)
            .map_err(DocStoreError::storage("stat document", &file_path))?;

        if file.exists() {
            return DocRef::new(file, Arc::clone(&self.client));
        }
        if !allow_create {
            return Err(DocStoreError::NotFound { path: file_path });
        }

        let file = self
            .client
            .write_file(&[], &file_path, &WriteOptions::overwrite())
            .map_err(DocStoreError::storage("create document", &file_path))?;
        debug!(path = %file_path, "created empty document");
        DocRef::new(file, Arc::clone(&self.client))
    }

    /// Remove the document `name`. A missing document is
    /// [`DocStoreError::NotFound`].
    pub fn remove_document(&self, name: &str) -> DocStoreResult<()> {
        self.get_document(name, false)?.remove()
    }

    /// The sub-collection `name`, created if it does not exist yet.
    pub fn get_collection(&self, name: &str) -> DocStoreResult<Collection> {
        let sub = Collection::new(Arc::clone(&self.client), self.sub_path(name)?);
        let dir = sub.path();

        match self.client.make_directory(&dir) {
            Ok(()) => debug!(path = %dir, "created collection"),
            Err(e) if e.is(StorageErrorKind::DirectoryExists) => {
                debug!(path = %dir, "collection already exists")
            }
            Err(e) => return Err(DocStoreError::storage("create collection", &dir)(e)),
        }
        Ok(sub)
    }

    /// Remove the sub-collection `name` and everything in it. Removing a
    /// collection that does not exist succeeds.
    pub fn remove_collection(&self, name: &str) -> DocStoreResult<()> {
        let dir = path::join(&self.sub_path(name)?);

        match self.client.remove_file(&dir, 0, &RemoveOptions::directory()) {
            Ok(()) => debug!(path = %dir, "removed collection"),
            Err(e) if e.is(StorageErrorKind::NotFound) => {
                debug!(path = %dir, "collection already absent")
            }
            Err(e) => return Err(DocStoreError::storage("remove collection", &dir)(e)),
        }
        Ok(())
    }

    /// The collection one level up. Top-level collections have no parent
    /// below the store root; use the [`DocStore`](crate::DocStore) for those.
    pub fn parent(&self) -> DocStoreResult<Collection> {
        if self.path.len() <= 1 {
            return Err(DocStoreError::IsRoot { path: self.path() });
        }
        let parent = self.path[..self.path.len() - 1].to_vec();
        Ok(Collection::new(Arc::clone(&self.client), parent))
    }

    /// Name of the collection (its last path segment).
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    /// Canonical absolute path of the collection.
    pub fn path(&self) -> String {
        path::join(&self.path)
    }

    fn sub_path(&self, name: &str) -> DocStoreResult<Vec<String>> {
        let added = path::collection_segments(name)
            .map_err(|reason| self.invalid(name, reason))?;
        let mut segments = self.path.clone();
        segments.extend(added);
        Ok(segments)
    }

    fn invalid(&self, name: &str, reason: &str) -> DocStoreError {
        DocStoreError::InvalidLocation {
            path: format!("{}/{name}", self.path().trim_end_matches('/')),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("path", &self.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstore_storage::{FileDescriptor, InMemoryStorage, StorageError, StorageResult};
    use serde_json::json;

    use crate::document::Document;

    fn setup() -> (Arc<InMemoryStorage>, Collection) {
        let storage = Arc::new(InMemoryStorage::new());
        storage.make_directory("/users").unwrap();
        let client: Arc<dyn StorageClient> = storage.clone();
        (storage, Collection::new(client, vec!["users".into()]))
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    #[test]
    fn get_missing_document_without_create_is_not_found() {
        let (storage, users) = setup();
        let err = users.get_document("alice", false).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "not found: /users/alice.json");
        assert_eq!(storage.file_count(), 0);
    }

    #[test]
    fn get_missing_document_with_create_writes_empty_file() {
        let (storage, users) = setup();
        let doc = users.get_document("alice", true).unwrap();
        assert_eq!(doc.path(), "/users/alice");
        assert!(doc.exists());
        assert!(doc.get().unwrap().is_empty());
        assert_eq!(storage.read_file("/users/alice.json", 0).unwrap(), b"");
    }

    #[test]
    fn get_existing_document_does_not_write() {
        let (storage, users) = setup();
        users.get_document("alice", true).unwrap();
        let again = users.get_document("alice", true).unwrap();
        assert_eq!(again.descriptor().version, 1);
        assert_eq!(storage.versions("/users/alice.json").unwrap(), vec![1]);
    }

    #[test]
    fn document_name_clashing_with_directory_is_invalid() {
        let (storage, users) = setup();
        storage.make_directory("/users/odd.json").unwrap();
        let err = users.get_document("odd", false).unwrap_err();
        assert!(matches!(err, DocStoreError::InvalidLocation { .. }));
    }

    #[test]
    fn malformed_document_names_are_rejected() {
        let (storage, users) = setup();
        for bad in ["", ".", "..", "sub/", "sub/alice"] {
            let err = users.get_document(bad, true).unwrap_err();
            assert!(
                matches!(err, DocStoreError::InvalidLocation { .. }),
                "{bad:?} gave {err}"
            );
        }
        assert_eq!(storage.file_count(), 0);
        assert_eq!(storage.paths(), vec!["/users"]);
        assert!(users.list_documents().unwrap().is_empty());
    }

    #[test]
    fn list_documents_skips_directories() {
        let (_storage, users) = setup();
        users.get_document("alice", true).unwrap();
        users.get_document("bob", true).unwrap();
        users.get_collection("archive").unwrap();

        let docs = users.list_documents().unwrap();
        let names: Vec<&str> = docs.iter().map(DocRef::name).collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert_eq!(docs[0].parent().path(), "/users");
    }

    #[test]
    fn remove_document_then_missing() {
        let (_storage, users) = setup();
        let mut doc = users.get_document("alice", true).unwrap();
        doc.set(&[("k", json!(1))].into_iter().collect::<Document>())
            .unwrap();
        users.remove_document("alice").unwrap();
        assert!(users.list_documents().unwrap().is_empty());
        assert!(users.remove_document("alice").unwrap_err().is_not_found());
    }

    // -----------------------------------------------------------------------
    // Sub-collections
    // -----------------------------------------------------------------------

    #[test]
    fn get_collection_is_idempotent() {
        let (_storage, users) = setup();
        let first = users.get_collection("archive").unwrap();
        let second = users.get_collection("archive").unwrap();
        assert_eq!(first.path(), "/users/archive");
        assert_eq!(second.path(), first.path());
        assert_eq!(second.name(), "archive");
    }

    #[test]
    fn list_collections_uses_full_paths() {
        let (_storage, users) = setup();
        users.get_collection("b").unwrap();
        users.get_collection("a").unwrap();
        users.get_document("doc", true).unwrap();

        let paths: Vec<String> = users
            .list_collections()
            .unwrap()
            .iter()
            .map(Collection::path)
            .collect();
        assert_eq!(paths, vec!["/users/a", "/users/b"]);
    }

    #[test]
    fn remove_collection_is_idempotent() {
        let (storage, users) = setup();
        let archive = users.get_collection("archive").unwrap();
        archive.get_document("old", true).unwrap();

        users.remove_collection("archive").unwrap();
        assert!(!storage.file_status("/users/archive").unwrap().exists());
        users.remove_collection("archive").unwrap();
    }

    #[test]
    fn empty_collection_names_are_rejected() {
        let (_storage, users) = setup();
        assert!(matches!(
            users.get_collection("").unwrap_err(),
            DocStoreError::InvalidLocation { .. }
        ));
        assert!(matches!(
            users.remove_collection("/").unwrap_err(),
            DocStoreError::InvalidLocation { .. }
        ));
    }

    #[test]
    fn relative_collection_names_never_touch_the_parent() {
        let (storage, users) = setup();
        users.get_document("alice", true).unwrap();

        for bad in [".", "..", "./", "archive/..", "../users"] {
            assert!(matches!(
                users.get_collection(bad).unwrap_err(),
                DocStoreError::InvalidLocation { .. }
            ));
            assert!(matches!(
                users.remove_collection(bad).unwrap_err(),
                DocStoreError::InvalidLocation { .. }
            ));
        }
        assert!(storage.file_status("/users").unwrap().is_directory);
        assert!(storage.file_status("/users/alice.json").unwrap().exists());
    }

    #[test]
    fn parent_of_top_level_collection_is_root_error() {
        let (_storage, users) = setup();
        let err = users.parent().unwrap_err();
        assert!(matches!(err, DocStoreError::IsRoot { ref path } if path == "/users"));
    }

    #[test]
    fn parent_of_nested_collection() {
        let (_storage, users) = setup();
        let deep = users
            .get_collection("a")
            .unwrap()
            .get_collection("b")
            .unwrap();
        assert_eq!(deep.path(), "/users/a/b");
        assert_eq!(deep.parent().unwrap().path(), "/users/a");
        assert_eq!(deep.parent().unwrap().parent().unwrap().path(), "/users");
    }

    // -----------------------------------------------------------------------
    // Storage failures other than the tolerated ones surface
    // -----------------------------------------------------------------------

    struct FailingStorage;

    impl StorageClient for FailingStorage {
        fn list_files(&self, _path: &str) -> StorageResult<Vec<FileDescriptor>> {
            Err(StorageError::Backend("quota exceeded".into()))
        }
        fn file_status(&self, path: &str) -> StorageResult<FileDescriptor> {
            Ok(FileDescriptor::missing("/", path))
        }
        fn write_file(
            &self,
            _data: &[u8],
            _path: &str,
            _options: &WriteOptions,
        ) -> StorageResult<FileDescriptor> {
            Err(StorageError::Backend("permission denied".into()))
        }
        fn read_file(&self, _path: &str, _version: u64) -> StorageResult<Vec<u8>> {
            Err(StorageError::Backend("unreachable".into()))
        }
        fn remove_file(
            &self,
            _path: &str,
            _version: u64,
            _options: &RemoveOptions,
        ) -> StorageResult<()> {
            Err(StorageError::Backend("conflict".into()))
        }
        fn make_directory(&self, _path: &str) -> StorageResult<()> {
            Err(StorageError::Backend("permission denied".into()))
        }
    }

    fn failing() -> Collection {
        Collection::new(Arc::new(FailingStorage), vec!["users".into()])
    }

    #[test]
    fn other_storage_errors_surface_with_context() {
        let users = failing();

        let err = users.get_collection("archive").unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to create collection /users/archive: storage backend error: permission denied"
        );
        assert!(matches!(
            users.remove_collection("archive").unwrap_err(),
            DocStoreError::Storage { op: "remove collection", .. }
        ));
        assert!(matches!(
            users.list_documents().unwrap_err(),
            DocStoreError::Storage { .. }
        ));
        assert!(matches!(
            users.get_document("alice", true).unwrap_err(),
            DocStoreError::Storage { op: "create document", .. }
        ));
    }
}
