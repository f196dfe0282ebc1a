//! Timestamp helpers shared by every record.
//!
//! Timestamps are truncated to microseconds, the resolution PostgreSQL
//! stores, so a record read back from any backend equals the one written.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

/// Current UTC time at microsecond precision.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Returns a refresh timestamp strictly later than `previous`.
///
/// Uses `now` unless the clock has not moved past `previous`, in which
/// case the result is `previous` plus one microsecond.
#[must_use]
pub fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + TimeDelta::microseconds(1);
    now.trunc_subsecs(6).max(floor)
}
