//! Core enumeration and checkpoint logic
//!
//! Backend-agnostic: everything here runs against the adapter traits and
//! is covered by integration tests with in-memory fakes.

pub mod checkpoint;
pub mod filter;
pub mod lister;

pub use checkpoint::WatermarkStore;
pub use lister::{BucketListing, IncrementalLister};
