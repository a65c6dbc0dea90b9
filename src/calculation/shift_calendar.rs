//! Shift calendar evaluation.
//!
//! This module decides whether a given calendar date is a working day for a
//! member's [`ShiftSchedule`], and derives the working-days fingerprint used to
//! group members who compete for the same days.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::models::{ScheduleKind, ShiftSchedule};

/// Offset 0 when re-phasing rotating cycles for fingerprints.
const FINGERPRINT_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// First Monday after the epoch; weekly fingerprints read Monday to Sunday from here.
const FINGERPRINT_WEEK_START: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 5) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

#[derive(Debug, Clone, Copy)]
enum Lookup<'a> {
    Weekly(&'a [bool]),
    Cycle {
        pattern: &'a [bool],
        anchor: NaiveDate,
    },
}

/// A validated view over a [`ShiftSchedule`].
///
/// Construction checks the schedule once; lookups afterwards are infallible.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::ShiftCalendar;
/// use leave_engine::models::ShiftSchedule;
/// use chrono::NaiveDate;
///
/// let schedule = ShiftSchedule::weekdays();
/// let calendar = ShiftCalendar::new(&schedule).unwrap();
///
/// // 2026-01-16 is a Friday, 2026-01-17 a Saturday
/// assert!(calendar.is_working_day(NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()));
/// assert!(!calendar.is_working_day(NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ShiftCalendar<'a> {
    lookup: Lookup<'a>,
}

impl<'a> ShiftCalendar<'a> {
    /// Validates `schedule` and wraps it for lookups.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchedule`] if the pattern is empty, a fixed
    /// pattern does not have exactly 7 entries, or a rotating schedule has no
    /// anchor date.
    pub fn new(schedule: &'a ShiftSchedule) -> EngineResult<Self> {
        if schedule.pattern.is_empty() {
            return Err(invalid_schedule("pattern is empty"));
        }

        let lookup = match schedule.kind {
            ScheduleKind::Fixed => {
                if schedule.pattern.len() != 7 {
                    return Err(invalid_schedule(&format!(
                        "fixed pattern must have 7 entries, found {}",
                        schedule.pattern.len()
                    )));
                }
                Lookup::Weekly(&schedule.pattern)
            }
            ScheduleKind::Rotating => {
                let anchor = schedule
                    .anchor_date
                    .ok_or_else(|| invalid_schedule("rotating schedule has no anchor date"))?;
                Lookup::Cycle {
                    pattern: &schedule.pattern,
                    anchor,
                }
            }
        };

        Ok(Self { lookup })
    }

    /// Returns true if the member is rostered to work on `date`.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        match self.lookup {
            Lookup::Weekly(pattern) => pattern[date.weekday().num_days_from_monday() as usize],
            Lookup::Cycle { pattern, anchor } => pattern[cycle_offset(anchor, date, pattern.len())],
        }
    }

    /// Returns the stable key identifying this calendar's effective working days.
    ///
    /// The cycle is reduced to its minimal period. When that period divides a
    /// week the key is the weekly form `W:` followed by Monday-to-Sunday bits;
    /// otherwise it is `R<period>:` followed by the cycle re-phased to start on
    /// 1970-01-01. Two schedules that work exactly the same dates therefore
    /// share a fingerprint, whatever their kind or anchor.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::calculation::ShiftCalendar;
    /// use leave_engine::models::ShiftSchedule;
    /// use chrono::NaiveDate;
    ///
    /// let fixed = ShiftSchedule::weekdays();
    /// // A 14-day cycle anchored on a Monday that repeats the same working week
    /// let rotating = ShiftSchedule::rotating(
    ///     [true, true, true, true, true, false, false].repeat(2),
    ///     NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
    /// );
    ///
    /// let a = ShiftCalendar::new(&fixed).unwrap().fingerprint();
    /// let b = ShiftCalendar::new(&rotating).unwrap().fingerprint();
    /// assert_eq!(a, "W:1111100");
    /// assert_eq!(a, b);
    /// ```
    pub fn fingerprint(&self) -> String {
        let cycle_len = match self.lookup {
            Lookup::Weekly(pattern) => pattern.len(),
            Lookup::Cycle { pattern, .. } => pattern.len(),
        };
        let phased: Vec<bool> = FINGERPRINT_EPOCH
            .iter_days()
            .take(cycle_len)
            .map(|date| self.is_working_day(date))
            .collect();

        let period = minimal_period(&phased);
        if 7 % period == 0 {
            let week: String = FINGERPRINT_WEEK_START
                .iter_days()
                .take(7)
                .map(|date| bit(self.is_working_day(date)))
                .collect();
            format!("W:{}", week)
        } else {
            let cycle: String = phased[..period].iter().map(|d| bit(*d)).collect();
            format!("R{}:{}", period, cycle)
        }
    }
}

/// Returns true if `date` is a working day under `schedule`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSchedule`] if the schedule cannot be evaluated.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::is_working_day;
/// use leave_engine::models::ShiftSchedule;
/// use chrono::NaiveDate;
///
/// // Two days on, two days off, starting 2026-03-01
/// let schedule = ShiftSchedule::rotating(
///     vec![true, true, false, false],
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
/// );
/// assert!(is_working_day(&schedule, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()).unwrap());
/// assert!(!is_working_day(&schedule, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()).unwrap());
/// assert!(is_working_day(&schedule, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()).unwrap());
/// ```
pub fn is_working_day(schedule: &ShiftSchedule, date: NaiveDate) -> EngineResult<bool> {
    Ok(ShiftCalendar::new(schedule)?.is_working_day(date))
}

/// Returns the working-days fingerprint for `schedule`.
///
/// See [`ShiftCalendar::fingerprint`] for the key format.
pub fn working_days_fingerprint(schedule: &ShiftSchedule) -> EngineResult<String> {
    Ok(ShiftCalendar::new(schedule)?.fingerprint())
}

fn cycle_offset(anchor: NaiveDate, date: NaiveDate, len: usize) -> usize {
    let days = date.signed_duration_since(anchor).num_days();
    days.rem_euclid(len as i64) as usize
}

fn minimal_period(cycle: &[bool]) -> usize {
    (1..=cycle.len())
        .filter(|p| cycle.len() % p == 0)
        .find(|p| (0..cycle.len()).all(|i| cycle[i] == cycle[i % p]))
        .unwrap_or(cycle.len())
}

fn bit(working: bool) -> char {
    if working { '1' } else { '0' }
}

fn invalid_schedule(message: &str) -> EngineError {
    EngineError::InvalidSchedule {
        message: message.to_string(),
    }
}
