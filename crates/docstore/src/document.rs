use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocStoreError, DocStoreResult};

/// JSON object content of one document.
///
/// A document is a map from string keys to arbitrary JSON values. It is
/// decoded from storage bytes on read and encoded again on write; nothing is
/// cached between calls. Documents read through a
/// [`DocRef`](crate::DocRef) remember the name they were read under, but
/// equality only compares content.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    #[serde(skip)]
    name: Option<String>,
    data: Map<String, Value>,
}

impl Document {
    /// An empty, unnamed document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a document from storage bytes.
    ///
    /// Empty input is an empty document. Anything else must be a JSON
    /// object; malformed JSON and non-object values fail with
    /// [`DocStoreError::Decode`].
    pub fn from_bytes(data: &[u8]) -> DocStoreResult<Self> {
        if data.is_empty() {
            return Ok(Self::new());
        }
        let data: Map<String, Value> = serde_json::from_slice(data)?;
        Ok(Self { name: None, data })
    }

    pub(crate) fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name of the document this content was read from, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set `key` to `value`, returning the previous value.
    pub fn set_key(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn remove_key(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.data
    }

    /// Encode the content as compact JSON bytes.
    pub fn to_json(&self) -> DocStoreResult<Vec<u8>> {
        serde_json::to_vec(&self.data).map_err(DocStoreError::Encode)
    }

    /// Encode the content as indented JSON bytes.
    pub fn to_json_pretty(&self) -> DocStoreResult<Vec<u8>> {
        serde_json::to_vec_pretty(&self.data).map_err(DocStoreError::Encode)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl From<Map<String, Value>> for Document {
    fn from(data: Map<String, Value>) -> Self {
        Self { name: None, data }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let data = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { name: None, data }
    }
}
