//! Working-day counting over date ranges.
//!
//! All ranges are inclusive of both endpoints. Inverted ranges (end before
//! start) count as zero days rather than failing, so downstream arithmetic
//! stays total over imperfect historical data.

use chrono::{Datelike, NaiveDate};

use crate::error::EngineResult;
use crate::models::ShiftSchedule;

use super::ShiftCalendar;

/// Iterates every calendar date from `start` to `end` inclusive.
///
/// Yields nothing when `end` precedes `start`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |date| *date <= end)
}

impl ShiftCalendar<'_> {
    /// Counts this calendar's working days between `start` and `end` inclusive.
    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        days_inclusive(start, end)
            .filter(|date| self.is_working_day(*date))
            .count() as u32
    }

    /// Counts working days between `start` and `end` inclusive that fall in one
    /// of `months` (1-12). An empty month list places no restriction.
    pub fn count_working_days_in_months(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        months: &[u32],
    ) -> u32 {
        days_inclusive(start, end)
            .filter(|date| months.is_empty() || months.contains(&date.month()))
            .filter(|date| self.is_working_day(*date))
            .count() as u32
    }
}

/// Counts the working days in an inclusive date range for `schedule`.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidSchedule`] if the schedule
/// cannot be evaluated.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::count_working_days;
/// use leave_engine::models::ShiftSchedule;
/// use chrono::NaiveDate;
///
/// let schedule = ShiftSchedule::weekdays();
/// // Monday 2026-01-12 to Sunday 2026-01-18
/// let start = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 1, 18).unwrap();
///
/// assert_eq!(count_working_days(&schedule, start, end).unwrap(), 5);
/// assert_eq!(count_working_days(&schedule, end, start).unwrap(), 0);
/// ```
pub fn count_working_days(
    schedule: &ShiftSchedule,
    start: NaiveDate,
    end: NaiveDate,
) -> EngineResult<u32> {
    Ok(ShiftCalendar::new(schedule)?.count_working_days(start, end))
}

/// Counts every calendar day in an inclusive date range.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::count_calendar_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// assert_eq!(count_calendar_days(start, end), 4);
/// assert_eq!(count_calendar_days(end, start), 0);
/// ```
pub fn count_calendar_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }
    (end.signed_duration_since(start).num_days() + 1) as u32
}
