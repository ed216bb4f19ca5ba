//! Identifier helpers
//!
//! Timeline identifiers are opaque decimal strings that grow over time.
//! They can exceed `u64` in principle, so ordering is done on the digits.

use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

/// Epoch offset (ms) of snowflake identifiers
const SNOWFLAKE_EPOCH_MS: i64 = 1_288_834_974_657;

/// Compare two decimal identifiers numerically
///
/// Leading zeros are ignored, so `"0"` sorts before every real identifier.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Creation time encoded in a snowflake identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdTimestamp {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Calendar date (UTC)
    pub date: NaiveDate,
}

/// Decode the creation time of a snowflake identifier
///
/// Returns `None` for identifiers that are not valid unsigned integers.
pub fn id_timestamp(id: &str) -> Option<IdTimestamp> {
    let raw: u64 = id.parse().ok()?;
    let timestamp_ms = (raw >> 22) as i64 + SNOWFLAKE_EPOCH_MS;
    let date = DateTime::<Utc>::from_timestamp_millis(timestamp_ms)?.date_naive();
    Some(IdTimestamp { timestamp_ms, date })
}
