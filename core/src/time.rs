//! Fractional-second arithmetic on UTC instants.

use chrono::{DateTime, Duration, Utc};

/// Signed seconds from `from` to `to`, millisecond precision
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1_000.0
}

/// Offset an instant by fractional seconds, rounded to the millisecond
pub fn offset_by_seconds(instant: DateTime<Utc>, secs: f64) -> DateTime<Utc> {
    instant + Duration::milliseconds((secs * 1_000.0).round() as i64)
}
