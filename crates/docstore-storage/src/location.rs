//! Path normalization shared by the backends.

use crate::error::{StorageError, StorageResult};

/// A normalized storage path: non-empty segments, no `.` or `..`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Location {
    segments: Vec<String>,
}

impl Location {
    /// Parse a slash-separated path. Empty and `.` components are dropped;
    /// `..` is rejected so a path can never climb above the root.
    pub(crate) fn parse(path: &str) -> StorageResult<Self> {
        let mut segments = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(StorageError::InvalidPath(path.to_string())),
                s => segments.push(s.to_string()),
            }
        }
        Ok(Self { segments })
    }

    pub(crate) fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Canonical form: `/` followed by the segments.
    pub(crate) fn key(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Last segment, or the empty string for the root.
    pub(crate) fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// The containing directory. The root is its own parent.
    pub(crate) fn parent(&self) -> Location {
        let mut segments = self.segments.clone();
        segments.pop();
        Location { segments }
    }

    /// Every proper ancestor from the root downwards, excluding the root.
    pub(crate) fn ancestors(&self) -> impl Iterator<Item = Location> + '_ {
        (1..self.segments.len()).map(move |n| Location {
            segments: self.segments[..n].to_vec(),
        })
    }
}
