use docstore_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocStoreError {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("invalid location {path}: {reason}")]
    InvalidLocation { path: String, reason: String },

    #[error("document is not a valid JSON object: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to {op} {path}: {source}")]
    Storage {
        op: &'static str,
        path: String,
        #[source]
        source: StorageError,
    },

    #[error("collection {path} has no parent below the store root")]
    IsRoot { path: String },
}

impl DocStoreError {
    /// Wrap a storage failure with the operation and path it happened on.
    pub(crate) fn storage<'a>(
        op: &'static str,
        path: &'a str,
    ) -> impl FnOnce(StorageError) -> Self + 'a {
        move |source| Self::Storage {
            op,
            path: path.to_string(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type DocStoreResult<T> = Result<T, DocStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_wrapper_keeps_op_and_path() {
        let path = String::from("/users/alice.json");
        let wrap = DocStoreError::storage("read document", &path);
        let err = wrap(StorageError::Backend("offline".into()));
        assert_eq!(
            err.to_string(),
            "failed to read document /users/alice.json: storage backend error: offline"
        );
        assert!(!err.is_not_found());
    }
}
