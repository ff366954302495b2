//! Calendar day - Day boundaries in the buddy owner's timezone
//!
//! Every "is it a new day?" decision goes through [`calendar_day_of`].

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar day of `timestamp` as seen in `timezone`
pub fn calendar_day_of(timestamp: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    timestamp.with_timezone(&timezone).date_naive()
}

/// True when `later` falls on a calendar day after `earlier`
pub fn crosses_day_boundary(earlier: DateTime<Utc>, later: DateTime<Utc>, timezone: Tz) -> bool {
    calendar_day_of(later, timezone) > calendar_day_of(earlier, timezone)
}
