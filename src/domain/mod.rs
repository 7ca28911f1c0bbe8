//! Core domain types and models
//!
//! This module contains the domain model for Tidemark: the object record
//! returned by the lister, the watermark checkpoint value, the error
//! hierarchy and the crate-wide `Result` alias.

pub mod errors;
pub mod object;
pub mod result;
pub mod watermark;

// Re-export commonly used types
pub use errors::{ObjectStoreError, TableStoreError, TidemarkError};
pub use object::{ObjectRecord, FOLDER_MARKER_SUFFIX};
pub use result::Result;
pub use watermark::Watermark;
