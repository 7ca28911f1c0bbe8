//! Watermark checkpoint store
//!
//! Persists the last-processed watermark as the single logical row of a
//! table, keys `1`/`1`. Reads bootstrap the table and the row on first
//! contact; updates fetch the current row immediately before replacing it
//! so the service's concurrency token can reject a lost update.

use crate::adapters::{TableRecord, TableStore};
use crate::domain::{Result, TableStoreError, Watermark};
use std::sync::Arc;
use tracing::{debug, info};

/// Partition key of the single checkpoint record
const PARTITION_KEY: &str = "1";

/// Row key of the single checkpoint record
const ROW_KEY: &str = "1";

/// Checkpoint store over a [`TableStore`] backend
pub struct WatermarkStore {
    store: Arc<dyn TableStore>,
    table: String,
    property: String,
}

impl WatermarkStore {
    /// Create a checkpoint store for the given table and property name
    pub fn new(
        store: Arc<dyn TableStore>,
        table: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        Self {
            store,
            table: table.into(),
            property: property.into(),
        }
    }

    /// Read the current watermark, bootstrapping the table and the record
    /// with the unset sentinel if either is missing.
    ///
    /// # Errors
    ///
    /// Returns a table store error if any backend call fails or if the
    /// stored value does not parse as a watermark.
    pub async fn current(&self) -> Result<Watermark> {
        self.ensure_table().await?;

        let Some(record) = self.store.get_first_record(&self.table).await? else {
            self.bootstrap_record().await?;
            return Ok(Watermark::unset());
        };

        let raw = record.get(&self.property).ok_or_else(|| {
            TableStoreError::InvalidResponse(format!(
                "Checkpoint record has no '{}' property",
                self.property
            ))
        })?;

        let watermark = Watermark::parse(raw).map_err(|e| {
            TableStoreError::InvalidResponse(format!("Stored watermark is invalid: {e}"))
        })?;

        debug!(table = %self.table, watermark = %watermark, "Read stored watermark");
        Ok(watermark)
    }

    /// Advance the stored watermark to `new_value`.
    ///
    /// Bootstraps the table and the record first. The unset sentinel is an
    /// initialization pass: bootstrap happens, the stored value is left
    /// alone. The update is idempotent for a fixed `new_value`, so a
    /// concurrency conflict can simply be retried by the caller.
    ///
    /// # Errors
    ///
    /// Returns a table store error if any backend call fails, including
    /// [`TableStoreError::ConcurrencyConflict`] when a concurrent writer
    /// replaced the record between the fetch and the replace, and
    /// [`TableStoreError::RecordNotFound`] when the record vanished.
    pub async fn advance(&self, new_value: Watermark) -> Result<()> {
        self.ensure_table().await?;

        let existing = self.store.get_first_record(&self.table).await?;
        if existing.is_none() {
            self.bootstrap_record().await?;
        }

        if new_value.is_unset() {
            debug!(
                table = %self.table,
                "New watermark is the unset sentinel, leaving the stored value untouched"
            );
            return Ok(());
        }

        // Re-fetch so the replace carries the freshest concurrency token,
        // including right after a bootstrap.
        let mut record = match existing {
            Some(record) => record,
            None => self
                .store
                .get_first_record(&self.table)
                .await?
                .ok_or_else(|| TableStoreError::RecordNotFound(self.table.clone()))?,
        };

        record.set(&self.property, new_value.encode());
        self.store.replace(&self.table, &record).await?;

        info!(
            table = %self.table,
            watermark = %new_value,
            "Advanced stored watermark"
        );
        Ok(())
    }

    async fn ensure_table(&self) -> Result<()> {
        let created = self.store.create_if_not_exists(&self.table).await?;
        if created {
            info!(table = %self.table, "Created checkpoint table");
        }
        Ok(())
    }

    async fn bootstrap_record(&self) -> Result<()> {
        let mut record = TableRecord::new(PARTITION_KEY, ROW_KEY);
        record.set(&self.property, Watermark::unset().encode());

        // An insert conflict from a concurrent bootstrapper is absorbed by
        // the backend and reported as success.
        self.store.insert(&self.table, &record).await?;

        info!(table = %self.table, "Bootstrapped checkpoint record with the unset sentinel");
        Ok(())
    }
}
