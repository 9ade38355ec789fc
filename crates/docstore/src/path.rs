//! Path arithmetic for collections and documents.
//!
//! Storage paths are slash-separated and absolute. Internally every handle
//! keeps its location as a list of non-empty segments; the root is the empty
//! list. Documents are stored as `<name>.json`.

/// Suffix every document file carries in storage.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Split a slash-separated path into its non-empty segments.
///
/// Leading, trailing and repeated slashes are ignored.
///
/// ```
/// use docstore::path::split;
///
/// assert_eq!(split("//users/alice.json/"), vec!["users", "alice.json"]);
/// assert!(split("/").is_empty());
/// ```
pub fn split(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join segments into an absolute path. No segments gives `/`.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let parts: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
    format!("/{}", parts.join("/"))
}

/// Map a document name to its storage file name.
pub fn add_extension(name: &str) -> String {
    format!("{name}.{DOCUMENT_EXTENSION}")
}

/// Map a storage file name back to a document name.
///
/// A leading `/` is dropped; names without the document suffix come back
/// unchanged.
pub fn strip_extension(file_name: &str) -> &str {
    let name = file_name.trim_start_matches('/');
    name.strip_suffix(".json").unwrap_or(name)
}

/// Split a collection name into segments below the current collection.
///
/// Slashes address nested collections. Empty names and `.` or `..`
/// segments are refused.
pub(crate) fn collection_segments(name: &str) -> Result<Vec<String>, &'static str> {
    let segments = split(name);
    if segments.is_empty() {
        return Err("collection name is empty");
    }
    if segments.iter().any(|s| is_relative(s)) {
        return Err("`.` and `..` are not collection names");
    }
    Ok(segments)
}

/// Check that `name` can be stored as a single document file.
pub(crate) fn document_name(name: &str) -> Result<&str, &'static str> {
    match name {
        "" => Err("document name is empty"),
        _ if is_relative(name) => Err("`.` and `..` are not document names"),
        _ if name.contains('/') => Err("document name contains a slash"),
        _ => Ok(name),
    }
}

fn is_relative(segment: &str) -> bool {
    segment == "." || segment == ".."
}
