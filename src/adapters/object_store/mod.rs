//! Object-storage abstraction
//!
//! This module defines the trait that object-storage adapters must
//! implement to be enumerated by the incremental lister, plus the
//! transient page type the backend returns.

pub mod s3;

use crate::domain::{ObjectRecord, Result};
use async_trait::async_trait;

pub use s3::S3ObjectStore;

/// One page of a paginated bucket listing
///
/// Transient: produced by the backend, consumed by the lister, never
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    /// Raw entries in backend order
    pub entries: Vec<ObjectRecord>,

    /// Opaque cursor for the next page, if the backend issued one
    pub next_continuation_token: Option<String>,

    /// Whether the backend reports more results beyond this page
    pub is_truncated: bool,
}

/// Object-storage client trait
///
/// The pagination protocol is strictly sequential: the token returned with
/// page N must be supplied to obtain page N+1, so pages can never be
/// fetched in parallel.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one page of the bucket listing.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Bucket to enumerate
    /// * `continuation_token` - Cursor from the previous page, absent on
    ///   the first request
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the request or the response
    /// cannot be interpreted.
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<ObjectPage>;
}
