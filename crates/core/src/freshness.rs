//! Freshness evaluation for cached icon entries.
//!
//! An entry is usable while its `date` header is at most [`MAX_AGE`] old and
//! nothing in its headers forbids storing it. Anything that prevents
//! establishing the age counts as expired.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::HeaderFields;
use crate::cache::CacheEntry;

/// Maximum age of a cached icon (30 days).
pub const MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Header carrying the time the payload was produced.
pub const TIMESTAMP_HEADER: &str = "date";

/// Decide whether `entry` must be treated as absent at `now`.
pub fn is_expired(entry: Option<&CacheEntry>, now: DateTime<Utc>) -> bool {
    let Some(entry) = entry else {
        return true;
    };
    let headers = &entry.headers;
    if headers.is_empty() || forbids_storage(headers) {
        return true;
    }

    let Some(stored) = timestamp(headers) else {
        return true;
    };

    let age = now.signed_duration_since(stored);
    age.num_milliseconds() > MAX_AGE.as_millis() as i64
}

/// Whether `cache-control` carries a `no-store` directive.
pub fn forbids_storage(headers: &HeaderFields) -> bool {
    headers
        .get("cache-control")
        .map(|value| {
            value
                .split(',')
                .any(|directive| directive.trim().eq_ignore_ascii_case("no-store"))
        })
        .unwrap_or(false)
}

/// Parse the timestamp header as an HTTP-date, falling back to RFC 3339.
pub fn timestamp(headers: &HeaderFields) -> Option<DateTime<Utc>> {
    let raw = headers.get(TIMESTAMP_HEADER)?.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
