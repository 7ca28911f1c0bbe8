//! Operation boundary consumed by an external HTTP layer
//!
//! This crate does not host an HTTP server; it exposes the request model,
//! payload shapes and the two operations so any thin transport can wire
//! them up.

pub mod operations;
pub mod request;
pub mod response;

pub use operations::{advance_watermark, list_objects, ADVANCE_FIELD, LIST_FIELD};
pub use request::OperationRequest;
pub use response::{AdvancePayload, ListPayload, OperationResponse};
