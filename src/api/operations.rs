//! Boundary operations
//!
//! The two entry points consumed by the external HTTP layer. All failures
//! are converted here into a small set of client-facing messages; full
//! detail goes only to the operational log. No partial success is ever
//! exposed as success.

use crate::api::request::OperationRequest;
use crate::api::response::{AdvancePayload, ListPayload, OperationResponse};
use crate::core::{IncrementalLister, WatermarkStore};
use crate::domain::{TidemarkError, Watermark};
use tracing::{error, info};

/// Request field naming the watermark to list against
pub const LIST_FIELD: &str = "s3BucketLastProcessedDateTimeUtc";

/// Request field naming the watermark to advance to
pub const ADVANCE_FIELD: &str = "newLastProcessedDateTimeUtc";

/// Generic message for enumeration failures
const OBJECT_STORE_FAILURE: &str =
    "Operation failed (object storage error). Check the operational log for details.";

/// Generic message for every other backend failure
const GENERIC_FAILURE: &str = "Operation failed. Check the operational log for details.";

fn missing_field_message(field: &str) -> String {
    format!(
        "A '{field}' querystring parameter or a request body containing a JSON object \
         with a '{field}' property was expected but not found."
    )
}

fn parse_watermark_field(
    request: &OperationRequest,
    field: &str,
) -> Result<Watermark, OperationResponse> {
    let Some(raw) = request.field(field) else {
        let message = missing_field_message(field);
        info!(field = %field, "{message}");
        return Err(OperationResponse::ClientError(message));
    };

    Watermark::parse(&raw).map_err(|e| {
        let message = format!("The '{field}' value is invalid: {e}.");
        info!(field = %field, value = %raw, "{message}");
        OperationResponse::ClientError(message)
    })
}

/// List every object modified since the watermark named in the request.
///
/// On success the payload carries the admitted objects plus the timestamp
/// the caller should persist as the next watermark once it has durably
/// processed them.
pub async fn list_objects(
    lister: &IncrementalLister,
    bucket: &str,
    request: &OperationRequest,
) -> OperationResponse {
    let watermark = match parse_watermark_field(request, LIST_FIELD) {
        Ok(watermark) => watermark,
        Err(response) => return response,
    };

    match lister.list(bucket, watermark).await {
        Ok(listing) => {
            let payload = ListPayload {
                s3_objects: listing.objects,
                new_last_processed_date_time_utc: Watermark::at(listing.observed_at).encode(),
            };
            match serde_json::to_value(&payload) {
                Ok(value) => OperationResponse::Success(value),
                Err(e) => {
                    error!(error = %e, "Failed to serialize list payload");
                    OperationResponse::ClientError(GENERIC_FAILURE.to_string())
                }
            }
        }
        Err(TidemarkError::Validation(message)) => {
            info!("{message}");
            OperationResponse::ClientError(message)
        }
        Err(e @ TidemarkError::ObjectStore(_)) => {
            error!(error = %e, "Bucket enumeration failed");
            OperationResponse::ClientError(OBJECT_STORE_FAILURE.to_string())
        }
        Err(e) => {
            error!(error = %e, "List operation failed");
            OperationResponse::ClientError(GENERIC_FAILURE.to_string())
        }
    }
}

/// Advance the stored watermark to the value named in the request.
pub async fn advance_watermark(
    store: &WatermarkStore,
    request: &OperationRequest,
) -> OperationResponse {
    let new_value = match parse_watermark_field(request, ADVANCE_FIELD) {
        Ok(watermark) => watermark,
        Err(response) => return response,
    };

    match store.advance(new_value).await {
        Ok(()) => match serde_json::to_value(AdvancePayload::succeeded()) {
            Ok(value) => OperationResponse::Success(value),
            Err(e) => {
                error!(error = %e, "Failed to serialize advance payload");
                OperationResponse::ClientError(GENERIC_FAILURE.to_string())
            }
        },
        Err(e) => {
            error!(
                error = %e,
                retryable = e.is_retryable(),
                "Watermark advance failed"
            );
            OperationResponse::ClientError(GENERIC_FAILURE.to_string())
        }
    }
}
