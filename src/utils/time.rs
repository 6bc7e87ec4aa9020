//! Time and timestamp utilities

use chrono::{DateTime, Duration, DurationRound, Utc};

/// Current UTC time, used to stamp events at intake
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Truncate a timestamp to the start of its hour
pub fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(Duration::hours(1)).unwrap_or(ts)
}
