//! Calendar-aware durations.
//!
//! Months are counted on the calendar (January 31 plus one month is the last
//! day of February), never as a fixed number of days.

use chrono::{Datelike, Months, NaiveDateTime};
use serde::Serialize;

/// Elapsed time broken down into calendar units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CalendarDuration {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CalendarDuration {
    /// Duration from `start` to `end`. Negative when `end` precedes `start`.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let (lo, hi, sign) = if end >= start {
            (start, end, 1)
        } else {
            (end, start, -1)
        };

        let shift = |months: u32| lo.checked_add_months(Months::new(months));

        let months = (hi.year() - lo.year()) * 12 + (hi.month() as i32 - lo.month() as i32);
        let mut months = months.max(0) as u32;
        let mut anchor = shift(months).unwrap_or(hi);
        while anchor > hi && months > 0 {
            months -= 1;
            anchor = shift(months).unwrap_or(lo);
        }

        let rest = (hi - anchor).num_seconds();
        Self {
            years: sign * (months / 12) as i64,
            months: sign * (months % 12) as i64,
            days: sign * (rest / 86_400),
            hours: sign * (rest % 86_400 / 3_600),
            minutes: sign * (rest % 3_600 / 60),
            seconds: sign * (rest % 60),
        }
    }
}

impl std::fmt::Display for CalendarDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} years {} months {} days {} hours {} minutes",
            self.years, self.months, self.days, self.hours, self.minutes
        )
    }
}
