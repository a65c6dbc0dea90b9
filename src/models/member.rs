//! Team member model and related types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ShiftSchedule;

/// The shift a member is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftTag {
    /// Day shift.
    Day,
    /// Night shift.
    Night,
    /// Works a mix of day and night shifts.
    Mixed,
    /// No shift assigned yet.
    Unassigned,
}

impl std::fmt::Display for ShiftTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftTag::Day => write!(f, "day"),
            ShiftTag::Night => write!(f, "night"),
            ShiftTag::Mixed => write!(f, "mixed"),
            ShiftTag::Unassigned => write!(f, "unassigned"),
        }
    }
}

impl Default for ShiftTag {
    fn default() -> Self {
        ShiftTag::Unassigned
    }
}

/// The type of parental leave a member is entitled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentalLeaveType {
    /// Maternity leave.
    Maternity,
    /// Paternity leave.
    Paternity,
    /// No parental leave entitlement.
    None,
}

/// Leader-entered values that take precedence over computed figures for one pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverride {
    /// Authoritative remaining balance.
    #[serde(default)]
    pub balance: Option<Decimal>,
    /// Authoritative days used so far this year.
    #[serde(default)]
    pub year_to_date_used: Option<Decimal>,
}

impl ManualOverride {
    /// Returns true if neither override value is set.
    pub fn is_empty(&self) -> bool {
        self.balance.is_none() && self.year_to_date_used.is_none()
    }
}

/// A member of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier for the member.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// The member's working pattern.
    pub shift_schedule: ShiftSchedule,
    /// The member's shift assignment.
    #[serde(default)]
    pub shift_tag: ShiftTag,
    /// Optional free-text grouping key within the team.
    #[serde(default)]
    pub subgroup_tag: Option<String>,
    /// Overrides for the ordinary leave pool.
    #[serde(default)]
    pub ordinary_override: ManualOverride,
    /// Overrides for the parental leave pool.
    #[serde(default)]
    pub parental_override: ManualOverride,
    /// Parental leave entitlement, if any.
    #[serde(default)]
    pub parental_leave_type: Option<ParentalLeaveType>,
}

impl Member {
    /// Returns the parental leave type the member is entitled to, treating
    /// `None` and an explicit `none` the same way.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{Member, ParentalLeaveType, ShiftSchedule};
    ///
    /// let mut member = Member::new("m_001", ShiftSchedule::weekdays());
    /// assert_eq!(member.parental_entitlement(), None);
    ///
    /// member.parental_leave_type = Some(ParentalLeaveType::Paternity);
    /// assert_eq!(member.parental_entitlement(), Some(ParentalLeaveType::Paternity));
    /// ```
    pub fn parental_entitlement(&self) -> Option<ParentalLeaveType> {
        match self.parental_leave_type {
            Some(ParentalLeaveType::None) | None => None,
            other => other,
        }
    }

    /// Creates a member with the given schedule and no tags or overrides.
    pub fn new(id: impl Into<String>, shift_schedule: ShiftSchedule) -> Self {
        Self {
            id: id.into(),
            name: None,
            shift_schedule,
            shift_tag: ShiftTag::Unassigned,
            subgroup_tag: None,
            ordinary_override: ManualOverride::default(),
            parental_override: ManualOverride::default(),
            parental_leave_type: None,
        }
    }
}
