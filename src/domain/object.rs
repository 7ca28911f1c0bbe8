//! Object-storage record model
//!
//! One discovered storage object: key, modification timestamp and size.
//! Field names on the wire match the JSON payload produced for the
//! downstream pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Suffix of zero-byte pseudo-directory markers created by some upload
/// tools. A key with this suffix and a size of zero is never real data.
pub const FOLDER_MARKER_SUFFIX: &str = "_$folder$";

/// One discovered storage object
///
/// Keys are unique within a bucket but not across buckets. `last_modified`
/// is set by the storage backend and immutable once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Object key, unique within the bucket
    pub key: String,

    /// Last-modified timestamp, UTC, assigned by the backend
    #[serde(rename = "lastModified")]
    pub last_modified: DateTime<Utc>,

    /// Object size in bytes
    pub size: u64,
}

impl ObjectRecord {
    /// Create a new object record
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>, size: u64) -> Self {
        Self {
            key: key.into(),
            last_modified,
            size,
        }
    }

    /// Whether this entry is a zero-byte pseudo-directory marker.
    ///
    /// Both conditions must hold: a nonzero object with the marker suffix is
    /// real data, and a zero-byte object with any other key is real data.
    pub fn is_folder_marker(&self) -> bool {
        self.size == 0 && self.key.ends_with(FOLDER_MARKER_SUFFIX)
    }
}
