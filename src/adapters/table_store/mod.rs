//! Table-storage abstraction
//!
//! This module defines the trait the checkpoint table backend must
//! implement, plus the flat record type exchanged with it.

pub mod azure;

use crate::domain::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub use azure::AzureTableStore;

/// A flat table record: fixed keys, an optional concurrency token and a
/// mapping of property name to string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRecord {
    /// Partition key
    pub partition_key: String,

    /// Row key
    pub row_key: String,

    /// Concurrency token returned by the service on reads; supplied back
    /// on replace so a conflicting concurrent writer fails the call
    /// instead of being silently clobbered
    pub etag: Option<String>,

    /// Flat property mapping
    pub properties: HashMap<String, String>,
}

impl TableRecord {
    /// Create an empty record with the given keys
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            etag: None,
            properties: HashMap::new(),
        }
    }

    /// Set a property value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Read a property value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// Table-storage client trait
///
/// The checkpoint store drives this interface; every method maps to a
/// single backend call with no state held across calls.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Whether the table exists
    async fn exists(&self, table: &str) -> Result<bool>;

    /// Create the table if it does not exist.
    ///
    /// Returns `true` if the table was created by this call, `false` if it
    /// already existed.
    async fn create_if_not_exists(&self, table: &str) -> Result<bool>;

    /// Fetch the first record of the table, if any.
    ///
    /// The checkpoint table holds exactly one logical row, so "first" is
    /// well-defined; the record carries the service's concurrency token.
    async fn get_first_record(&self, table: &str) -> Result<Option<TableRecord>>;

    /// Insert a new record.
    ///
    /// Inserting a record whose keys already exist is treated as success:
    /// the only insert this system performs is the checkpoint bootstrap,
    /// which must be idempotent under a concurrent bootstrapper.
    async fn insert(&self, table: &str, record: &TableRecord) -> Result<()>;

    /// Replace an existing record as a whole.
    ///
    /// The record's concurrency token is passed to the service; a mismatch
    /// surfaces as [`crate::domain::TableStoreError::ConcurrencyConflict`].
    async fn replace(&self, table: &str, record: &TableRecord) -> Result<()>;
}
