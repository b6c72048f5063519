//! HTTP cache control module
//!
//! Provides validator generation (`ETag`, `Last-Modified`) and conditional
//! request handling (`If-None-Match`, `If-Range`).

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a strong `ETag` from file size and modification time
///
/// Content is streamed, never hashed; size plus mtime changes whenever the
/// file is replaced.
///
/// # Returns
/// Quoted `ETag` string, e.g., `"3e8-18b7c9a4f00"`
pub fn generate_etag(size: u64, modified: Option<SystemTime>) -> String {
    let nanos = modified
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_nanos());
    format!("\"{size:x}-{nanos:x}\"")
}

/// Format a timestamp as an HTTP-date (RFC 7231 IMF-fixdate)
pub fn format_http_date(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Weak comparison: `W/"abc123"`
/// - Wildcard: `*`
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').any(|e| {
            let e = e.trim();
            e == "*" || e.trim_start_matches("W/") == etag
        })
    })
}

/// Decide whether a Range header may be honored given `If-Range`
///
/// No `If-Range` means yes. An entity-tag must match strongly; a date must
/// equal the current `Last-Modified` exactly. Anything else means the client's
/// copy is stale and the full entity must be sent.
pub fn if_range_allows(if_range: Option<&str>, etag: &str, last_modified: Option<&str>) -> bool {
    let Some(value) = if_range.map(str::trim) else {
        return true;
    };
    if value.starts_with("W/") {
        return false;
    }
    if value.starts_with('"') {
        return value == etag;
    }
    last_modified.is_some_and(|lm| lm == value)
}

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Private cache (browser cache only)
    Private(u32),
    /// No cache
    NoCache,
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::Private(max_age) => format!("private, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public(31_536_000) // 1 year
    }
}
