//! Countdown time math
//!
//! Shared by the server (TTL sanity checks) and the client countdown so the
//! two can never disagree about what "time left" means. Pure functions only;
//! callers always pass a fresh `now` so repeated calls cannot accumulate
//! drift.

use chrono::{DateTime, Utc};

/// Rounded remainder until a scheduled instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub is_expired: bool,
}

impl TimeRemaining {
    /// The zero remainder for past or unparseable instants
    #[must_use]
    pub const fn expired() -> Self {
        Self {
            days: 0,
            hours: 0,
            is_expired: true,
        }
    }
}

/// Compute the remaining days/hours until `scheduled_at`.
///
/// The sub-day remainder is rounded up so the display never under-counts the
/// time left: 14 h 30 m within a day shows as 15 h. A rounded remainder of
/// 24 h rolls over into one more day. An unparseable or past `scheduled_at`
/// yields the expired remainder.
#[must_use]
pub fn remaining(scheduled_at: &str, now: DateTime<Utc>) -> TimeRemaining {
    let target = match DateTime::parse_from_rfc3339(scheduled_at) {
        Ok(t) => t.with_timezone(&Utc),
        Err(_) => return TimeRemaining::expired(),
    };

    if target <= now {
        return TimeRemaining::expired();
    }

    let diff_ms = (target - now).num_milliseconds();
    let total_hours = diff_ms as f64 / (1000.0 * 60.0 * 60.0);
    let days = (total_hours / 24.0).floor() as i64;
    let sub_day_hours = (total_hours - (days as f64) * 24.0).ceil() as i64;

    let (days, hours) = if sub_day_hours >= 24 {
        (days + 1, 0)
    } else {
        (days, sub_day_hours)
    };

    TimeRemaining {
        days: days.max(0),
        hours: hours.max(0),
        is_expired: false,
    }
}
