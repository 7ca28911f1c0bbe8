//! Result type alias for Tidemark
//!
//! This module provides a convenient Result type alias that uses
//! TidemarkError as the error type.

use super::errors::TidemarkError;

/// Result type alias for Tidemark operations
///
/// This is a convenience type alias that uses `TidemarkError` as the error
/// type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use tidemark::domain::result::Result;
/// use tidemark::domain::errors::TidemarkError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TidemarkError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TidemarkError>;
