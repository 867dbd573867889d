//! Conversion between stored expiry strings and timestamps.
//!
//! Expiries are written as RFC 3339 timestamps. Reading is more lenient:
//! a naive `YYYY-MM-DDTHH:MM:SS` (or space separated) datetime without an
//! offset is accepted and interpreted as UTC, so rows written by other
//! tools still parse.
//!
//! Naive values are not read in the host's local time zone. A row written
//! as local wall-clock time on a host east or west of UTC will therefore
//! expire that many hours early or late.

use crate::error::{CoreError, Result};
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::Timestamp;

/// Parses a stored or user supplied expiry into a comparable timestamp.
pub fn to_timestamp(raw: &str) -> Result<Timestamp> {
    let raw = raw.trim();

    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(ts);
    }

    let civil: DateTime = raw
        .parse()
        .map_err(|e| CoreError::InvalidExpiry(format!("'{}': {e}", raw)))?;

    civil
        .to_zoned(TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(|e| CoreError::InvalidExpiry(format!("'{}': {e}", raw)))
}

/// Serializes an expiry in the form written to the `expiry` column.
pub fn to_stored(expiry: Timestamp) -> String {
    expiry.to_string()
}

/// Returns true when `expiry` lies strictly before `now`.
pub fn is_expired(expiry: Timestamp, now: Timestamp) -> bool {
    expiry < now
}
