//! Integration tests for the watermark checkpoint store against an
//! in-memory table backend

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tidemark::adapters::{TableRecord, TableStore};
use tidemark::core::WatermarkStore;
use tidemark::domain::{Result, TableStoreError, TidemarkError, Watermark};

const PROPERTY: &str = "LastProcessedDateTimeUtc";

#[derive(Default)]
struct TableState {
    exists: bool,
    record: Option<TableRecord>,
    etag_counter: u64,
}

/// In-memory table backend with etag-checked replace
#[derive(Default)]
struct InMemoryTableStore {
    state: Mutex<TableState>,
    replace_calls: AtomicUsize,
    /// When set, the stored record vanishes right before the next replace
    vanish_before_replace: std::sync::atomic::AtomicBool,
}

impl InMemoryTableStore {
    fn stored_value(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .record
            .as_ref()
            .and_then(|r| r.get(PROPERTY).map(str::to_string))
    }

    fn seed(&self, value: &str) {
        let mut state = self.state.lock().unwrap();
        state.exists = true;
        let mut record = TableRecord::new("1", "1");
        record.etag = Some("etag-0".to_string());
        record.set(PROPERTY, value);
        state.record = Some(record);
    }

    fn bump_etag(&self) {
        let mut state = self.state.lock().unwrap();
        state.etag_counter += 1;
        let tag = format!("etag-{}", state.etag_counter);
        if let Some(record) = state.record.as_mut() {
            record.etag = Some(tag);
        }
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn exists(&self, _table: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().exists)
    }

    async fn create_if_not_exists(&self, _table: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let created = !state.exists;
        state.exists = true;
        Ok(created)
    }

    async fn get_first_record(&self, _table: &str) -> Result<Option<TableRecord>> {
        Ok(self.state.lock().unwrap().record.clone())
    }

    async fn insert(&self, _table: &str, record: &TableRecord) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        // Conflicting insert is success, matching the idempotent bootstrap
        // behavior of the real backend.
        if state.record.is_none() {
            let mut stored = record.clone();
            state.etag_counter += 1;
            stored.etag = Some(format!("etag-{}", state.etag_counter));
            state.record = Some(stored);
        }
        Ok(())
    }

    async fn replace(&self, _table: &str, record: &TableRecord) -> Result<()> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);

        if self.vanish_before_replace.swap(false, Ordering::SeqCst) {
            self.state.lock().unwrap().record = None;
        }

        let mut state = self.state.lock().unwrap();
        let Some(stored) = state.record.as_mut() else {
            return Err(TableStoreError::RecordNotFound("watermarks".to_string()).into());
        };

        if record.etag != stored.etag {
            return Err(TableStoreError::ConcurrencyConflict("watermarks".to_string()).into());
        }

        stored.properties = record.properties.clone();
        state.etag_counter += 1;
        let tag = format!("etag-{}", state.etag_counter);
        state.record.as_mut().unwrap().etag = Some(tag);
        Ok(())
    }
}

fn watermark(y: i32, mo: u32, d: u32) -> Watermark {
    Watermark::at(Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap())
}

// First contact: reading from a missing table creates it, bootstraps the
// sentinel record and reports unset.
#[tokio::test]
async fn test_current_bootstraps_missing_table() {
    let backend = Arc::new(InMemoryTableStore::default());
    let store = WatermarkStore::new(backend.clone(), "watermarks", PROPERTY);

    let current = store.current().await.unwrap();
    assert!(current.is_unset());
    assert_eq!(
        backend.stored_value().as_deref(),
        Some("0001-01-01T00:00:00Z")
    );
}

// Advancing with the sentinel is an initialization pass: bootstrap only,
// an existing real watermark is left untouched.
#[tokio::test]
async fn test_advance_sentinel_does_not_disturb_history() {
    let backend = Arc::new(InMemoryTableStore::default());
    backend.seed("2024-03-01T00:00:00Z");
    let store = WatermarkStore::new(backend.clone(), "watermarks", PROPERTY);

    store.advance(Watermark::unset()).await.unwrap();

    assert_eq!(
        backend.stored_value().as_deref(),
        Some("2024-03-01T00:00:00Z")
    );
    assert_eq!(backend.replace_calls.load(Ordering::SeqCst), 0);
}

// Sentinel advance on a missing table bootstraps without error.
#[tokio::test]
async fn test_advance_sentinel_bootstraps_missing_table() {
    let backend = Arc::new(InMemoryTableStore::default());
    let store = WatermarkStore::new(backend.clone(), "watermarks", PROPERTY);

    store.advance(Watermark::unset()).await.unwrap();

    assert_eq!(
        backend.stored_value().as_deref(),
        Some("0001-01-01T00:00:00Z")
    );
}

// Normal advance overwrites the stored value.
#[tokio::test]
async fn test_advance_overwrites_stored_value() {
    let backend = Arc::new(InMemoryTableStore::default());
    backend.seed("2024-03-01T00:00:00Z");
    let store = WatermarkStore::new(backend.clone(), "watermarks", PROPERTY);

    store.advance(watermark(2024, 6, 1)).await.unwrap();

    assert_eq!(
        backend.stored_value().as_deref(),
        Some("2024-06-01T00:00:00Z")
    );
    assert_eq!(store.current().await.unwrap(), watermark(2024, 6, 1));
}

// Replaying the same target value yields the same end state.
#[tokio::test]
async fn test_advance_is_idempotent_for_fixed_value() {
    let backend = Arc::new(InMemoryTableStore::default());
    backend.seed("2024-03-01T00:00:00Z");
    let store = WatermarkStore::new(backend.clone(), "watermarks", PROPERTY);

    store.advance(watermark(2024, 6, 1)).await.unwrap();
    let after_first = backend.stored_value();

    store.advance(watermark(2024, 6, 1)).await.unwrap();
    assert_eq!(backend.stored_value(), after_first);
}

// A concurrent writer between fetch and replace surfaces as a conflict.
#[tokio::test]
async fn test_etag_conflict_surfaces_as_persistence_failure() {
    let backend = Arc::new(InMemoryTableStore::default());
    backend.seed("2024-03-01T00:00:00Z");

    let err = {
        struct StaleReads(Arc<InMemoryTableStore>);

        #[async_trait]
        impl TableStore for StaleReads {
            async fn exists(&self, table: &str) -> Result<bool> {
                self.0.exists(table).await
            }
            async fn create_if_not_exists(&self, table: &str) -> Result<bool> {
                self.0.create_if_not_exists(table).await
            }
            async fn get_first_record(&self, table: &str) -> Result<Option<TableRecord>> {
                let record = self.0.get_first_record(table).await?;
                // A concurrent writer lands right after this read.
                self.0.bump_etag();
                Ok(record)
            }
            async fn insert(&self, table: &str, record: &TableRecord) -> Result<()> {
                self.0.insert(table, record).await
            }
            async fn replace(&self, table: &str, record: &TableRecord) -> Result<()> {
                self.0.replace(table, record).await
            }
        }

        let racy_store =
            WatermarkStore::new(Arc::new(StaleReads(backend.clone())), "watermarks", PROPERTY);
        racy_store.advance(watermark(2024, 6, 1)).await.unwrap_err()
    };

    assert!(matches!(
        err,
        TidemarkError::TableStore(TableStoreError::ConcurrencyConflict(_))
    ));
    assert!(err.is_retryable());
    assert_eq!(
        backend.stored_value().as_deref(),
        Some("2024-03-01T00:00:00Z")
    );
}

// The record vanishing between fetch and replace is a persistence failure.
#[tokio::test]
async fn test_record_vanished_surfaces_as_persistence_failure() {
    let backend = Arc::new(InMemoryTableStore::default());
    backend.seed("2024-03-01T00:00:00Z");
    backend.vanish_before_replace.store(true, Ordering::SeqCst);
    let store = WatermarkStore::new(backend.clone(), "watermarks", PROPERTY);

    let err = store.advance(watermark(2024, 6, 1)).await.unwrap_err();
    assert!(matches!(
        err,
        TidemarkError::TableStore(TableStoreError::RecordNotFound(_))
    ));
    assert!(err.is_retryable());
}

// Legacy tables written by earlier tooling store the sentinel as
// "1/1/0001 12:00:00 AM"; reading one reports unset.
#[tokio::test]
async fn test_current_accepts_legacy_sentinel_encoding() {
    let backend = Arc::new(InMemoryTableStore::default());
    backend.seed("1/1/0001 12:00:00 AM");
    let store = WatermarkStore::new(backend.clone(), "watermarks", PROPERTY);

    assert!(store.current().await.unwrap().is_unset());
}

// A record missing the watermark property is an invalid response, not a
// silent unset.
#[tokio::test]
async fn test_current_rejects_record_without_property() {
    let backend = Arc::new(InMemoryTableStore::default());
    {
        let mut state = backend.state.lock().unwrap();
        state.exists = true;
        let mut record = TableRecord::new("1", "1");
        record.etag = Some("etag-0".to_string());
        record.properties = HashMap::new();
        state.record = Some(record);
    }
    let store = WatermarkStore::new(backend, "watermarks", PROPERTY);

    let err = store.current().await.unwrap_err();
    assert!(matches!(
        err,
        TidemarkError::TableStore(TableStoreError::InvalidResponse(_))
    ));
}
