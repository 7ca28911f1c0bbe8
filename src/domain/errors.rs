//! Domain error types
//!
//! This module defines the error hierarchy for Tidemark. All errors are
//! domain-specific and don't expose third-party SDK types.

use thiserror::Error;

/// Main Tidemark error type
///
/// This is the primary error type used throughout the application.
/// It wraps backend-specific error types and provides context for
/// error handling.
#[derive(Debug, Error)]
pub enum TidemarkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input validation errors (missing or unparsable caller input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Object-storage enumeration failures
    #[error("Object storage error: {0}")]
    ObjectStore(#[from] ObjectStoreError),

    /// Checkpoint table persistence failures
    #[error("Table storage error: {0}")]
    TableStore(#[from] TableStoreError),

    /// Secret-store credential lookup failures
    #[error("Credential error: {0}")]
    Credential(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl TidemarkError {
    /// Whether a retry with the same input can reasonably succeed.
    ///
    /// Persistence failures are retryable because the watermark update is
    /// idempotent for a fixed target value. Credential failures are
    /// retryable because the process-wide secret cache is never populated
    /// on failure, so the next call repeats the lookup.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TidemarkError::TableStore(_) | TidemarkError::Credential(_)
        )
    }
}

/// Object-storage specific errors
///
/// Errors raised while enumerating the bucket. A failure on any page aborts
/// the whole listing; no partial result is ever surfaced.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// Failed to reach the object-storage endpoint
    #[error("Failed to connect to object storage: {0}")]
    ConnectionFailed(String),

    /// A page listing request was rejected by the backend
    #[error("Listing failed for bucket '{bucket}': {message}")]
    ListFailed { bucket: String, message: String },

    /// The backend returned a response we could not interpret
    #[error("Invalid response from object storage: {0}")]
    InvalidResponse(String),
}

/// Table-storage specific errors
///
/// Errors raised by the checkpoint table backend. All of these are safe to
/// retry with the same input.
#[derive(Debug, Error)]
pub enum TableStoreError {
    /// Failed to reach the table-storage endpoint
    #[error("Failed to connect to table storage: {0}")]
    ConnectionFailed(String),

    /// Authentication against the table service failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Table creation failed
    #[error("Failed to create table '{table}': {message}")]
    CreateFailed { table: String, message: String },

    /// The checkpoint record vanished between the existence check and the
    /// fetch (race with a concurrent deleter)
    #[error("Checkpoint record not found in table '{0}'")]
    RecordNotFound(String),

    /// Record insert failed
    #[error("Failed to insert record: {0}")]
    InsertFailed(String),

    /// Record replace failed
    #[error("Failed to replace record: {0}")]
    ReplaceFailed(String),

    /// Concurrency token mismatch on replace (conflicting concurrent writer)
    #[error("Concurrency conflict replacing record in table '{0}'")]
    ConcurrencyConflict(String),

    /// Entity query failed
    #[error("Failed to query table: {0}")]
    QueryFailed(String),

    /// The service returned a response we could not interpret
    #[error("Invalid response from table storage: {0}")]
    InvalidResponse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for TidemarkError {
    fn from(err: std::io::Error) -> Self {
        TidemarkError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TidemarkError {
    fn from(err: serde_json::Error) -> Self {
        TidemarkError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TidemarkError {
    fn from(err: toml::de::Error) -> Self {
        TidemarkError::Configuration(format!("TOML parse error: {err}"))
    }
}
