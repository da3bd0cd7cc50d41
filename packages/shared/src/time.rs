//! Clock helpers.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Current wall-clock time in the server's local time zone.
pub fn now_local() -> DateTime<Local> {
    Local::now()
}

/// Current Unix timestamp in milliseconds.
pub fn get_unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current Unix timestamp in seconds.
pub fn get_unix_timestamp_secs() -> i64 {
    Utc::now().timestamp()
}

/// Render a Unix timestamp (milliseconds) as RFC 3339 in UTC.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339()
}
