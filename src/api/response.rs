//! Operation response model and payload shapes

use crate::domain::ObjectRecord;
use serde::Serialize;

/// Outcome of a boundary operation
///
/// `ClientError` carries only a generic or validation message; backend
/// detail stays in the operational log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResponse {
    /// Operation succeeded with the given JSON payload
    Success(serde_json::Value),

    /// Operation failed in a way the caller should see as a client error
    ClientError(String),
}

impl OperationResponse {
    /// Whether this is a success response
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResponse::Success(_))
    }
}

/// Payload of a successful list operation
#[derive(Debug, Clone, Serialize)]
pub struct ListPayload {
    /// Admitted objects, in backend listing order
    #[serde(rename = "s3Objects")]
    pub s3_objects: Vec<ObjectRecord>,

    /// Timestamp observed before enumeration started; the caller persists
    /// it as the next watermark after durably processing the objects
    #[serde(rename = "newLastProcessedDateTimeUtc")]
    pub new_last_processed_date_time_utc: String,
}

/// Payload of a successful advance operation
#[derive(Debug, Clone, Serialize)]
pub struct AdvancePayload {
    #[serde(rename = "Result")]
    pub result: String,
}

impl AdvancePayload {
    /// The fixed success payload
    pub fn succeeded() -> Self {
        Self {
            result: "Operation succeeded.".to_string(),
        }
    }
}
