//! Watermark model for incremental processing
//!
//! The watermark is the persisted boundary between processed and
//! unprocessed objects: everything modified at or before it has been
//! handled by a previous run. A distinguished unset sentinel (the
//! minimum calendar date) means "never processed".

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Legacy string encoding of the unset sentinel found in checkpoint tables
/// written by earlier tooling.
const LEGACY_UNSET_LITERAL: &str = "1/1/0001 12:00:00 AM";

/// Watermark timestamp with a distinguished unset sentinel
///
/// Comparison against object modification times is strict: an object whose
/// `last_modified` equals the watermark exactly is considered already
/// processed, so it is not re-emitted on every cycle once it lands on the
/// boundary.
///
/// Monotonic non-decrease across successful updates is a single-writer
/// caller-discipline requirement; the type itself is a plain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watermark(DateTime<Utc>);

impl Watermark {
    /// The unset sentinel: `0001-01-01T00:00:00Z`, meaning "never processed"
    pub fn unset() -> Self {
        let naive = NaiveDate::from_ymd_opt(1, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(NaiveDateTime::MIN);
        Watermark(DateTime::from_naive_utc_and_offset(naive, Utc))
    }

    /// A watermark at a specific instant
    pub fn at(value: DateTime<Utc>) -> Self {
        Watermark(value)
    }

    /// Whether this watermark is the unset sentinel
    pub fn is_unset(&self) -> bool {
        *self == Self::unset()
    }

    /// The underlying instant
    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    /// Whether an object modified at `last_modified` is newer than this
    /// watermark. Strict greater-than: the boundary itself is excluded.
    /// The unset sentinel admits everything.
    pub fn admits(&self, last_modified: DateTime<Utc>) -> bool {
        last_modified > self.0
    }

    /// Parse a watermark from its string encoding.
    ///
    /// Accepts RFC 3339 (the encoding this crate writes) and the legacy
    /// unset literal `1/1/0001 12:00:00 AM` still present in checkpoint
    /// tables bootstrapped by earlier tooling.
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err("watermark string is empty".to_string());
        }

        if trimmed == LEGACY_UNSET_LITERAL {
            return Ok(Self::unset());
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Watermark(parsed.with_timezone(&Utc)));
        }

        // Bare date-times without an offset are taken as UTC.
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
            return Ok(Watermark(DateTime::from_naive_utc_and_offset(naive, Utc)));
        }

        Err(format!("'{trimmed}' is not a valid UTC timestamp"))
    }

    /// RFC 3339 string encoding, as stored in the checkpoint table
    pub fn encode(&self) -> String {
        self.0.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl From<DateTime<Utc>> for Watermark {
    fn from(value: DateTime<Utc>) -> Self {
        Watermark(value)
    }
}
