use std::sync::Arc;

use docstore_storage::StorageClient;

use crate::collection::Collection;
use crate::error::{DocStoreError, DocStoreResult};
use crate::path;

/// Root of the document hierarchy.
///
/// The store holds only the shared storage client. Top-level collections are
/// directories directly under `/`; nested collections are reached through
/// [`Collection::get_collection`] or [`DocStore::collection`].
#[derive(Clone)]
pub struct DocStore {
    client: Arc<dyn StorageClient>,
}

impl DocStore {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    /// Every top-level collection.
    pub fn list_collections(&self) -> DocStoreResult<Vec<Collection>> {
        self.root().list_collections()
    }

    /// The top-level collection `name`, created if it does not exist yet.
    pub fn get_collection(&self, name: &str) -> DocStoreResult<Collection> {
        self.root().get_collection(name)
    }

    /// Remove the top-level collection `name`. Removing a collection that
    /// does not exist succeeds.
    pub fn remove_collection(&self, name: &str) -> DocStoreResult<()> {
        self.root().remove_collection(name)
    }

    /// Resolve a slash-separated collection path such as `org/users`,
    /// creating every level that is missing.
    pub fn collection(&self, collection_path: &str) -> DocStoreResult<Collection> {
        let segments = self.segments(collection_path)?;
        segments
            .iter()
            .try_fold(self.root(), |col, name| col.get_collection(name))
    }

    /// Handle to the collection at `collection_path` without touching
    /// storage. Listing a collection that does not exist fails.
    pub fn collection_at(&self, collection_path: &str) -> DocStoreResult<Collection> {
        let segments = self.segments(collection_path)?;
        Ok(Collection::new(Arc::clone(&self.client), segments))
    }

    /// Path of the store root, always `/`.
    pub fn root_path(&self) -> String {
        self.root().path()
    }

    fn segments(&self, collection_path: &str) -> DocStoreResult<Vec<String>> {
        path::collection_segments(collection_path).map_err(|reason| {
            DocStoreError::InvalidLocation {
                path: collection_path.to_string(),
                reason: reason.into(),
            }
        })
    }

    fn root(&self) -> Collection {
        Collection::new(Arc::clone(&self.client), Vec::new())
    }
}

impl std::fmt::Debug for DocStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStore").finish_non_exhaustive()
    }
}
