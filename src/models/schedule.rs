//! Shift schedule model.
//!
//! This module defines the [`ShiftSchedule`] struct describing which calendar
//! days a member is rostered to work, either as a fixed weekly pattern or as a
//! rotating cycle measured from an anchor date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The kind of working pattern a schedule describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// A 7-day pattern indexed by weekday (index 0 = Monday, 6 = Sunday).
    Fixed,
    /// A repeating cycle of arbitrary length, offset from an anchor date.
    Rotating,
}

/// A member's shift schedule.
///
/// The schedule is an immutable snapshot used for a single analytics run.
///
/// # Example
///
/// ```
/// use leave_engine::models::{ScheduleKind, ShiftSchedule};
///
/// let schedule = ShiftSchedule::weekdays();
/// assert_eq!(schedule.kind, ScheduleKind::Fixed);
/// assert_eq!(schedule.pattern.iter().filter(|d| **d).count(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSchedule {
    /// Whether the pattern is a fixed week or a rotating cycle.
    pub kind: ScheduleKind,
    /// Working-day flags; weekday-indexed for fixed schedules.
    pub pattern: Vec<bool>,
    /// Date of cycle offset 0 for rotating schedules.
    #[serde(default)]
    pub anchor_date: Option<NaiveDate>,
}

impl ShiftSchedule {
    /// Creates a fixed weekly schedule from Monday-first flags.
    pub fn fixed(pattern: [bool; 7]) -> Self {
        Self {
            kind: ScheduleKind::Fixed,
            pattern: pattern.to_vec(),
            anchor_date: None,
        }
    }

    /// Creates a rotating schedule whose first pattern entry falls on `anchor_date`.
    pub fn rotating(pattern: Vec<bool>, anchor_date: NaiveDate) -> Self {
        Self {
            kind: ScheduleKind::Rotating,
            pattern,
            anchor_date: Some(anchor_date),
        }
    }

    /// Monday to Friday, weekends off.
    pub fn weekdays() -> Self {
        Self::fixed([true, true, true, true, true, false, false])
    }

    /// Returns the number of working days in one full cycle of the pattern.
    pub fn working_days_per_cycle(&self) -> usize {
        self.pattern.iter().filter(|d| **d).count()
    }
}
