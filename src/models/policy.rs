//! Team policy and policy year models.
//!
//! This module contains the [`TeamPolicy`] configured by a team leader and the
//! [`PolicyYear`] window that bounds every balance and capacity calculation.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::ParentalLeaveType;

/// How days are counted against a parental leave pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingMethod {
    /// Only the member's rostered working days count.
    #[default]
    WorkingDays,
    /// Every calendar day in the request counts.
    CalendarDays,
}

/// Policy for one parental leave type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentalLeavePolicy {
    /// Whether this leave type is offered by the team.
    #[serde(default)]
    pub enabled: bool,
    /// Days available per policy year.
    #[serde(default)]
    pub max_days: Decimal,
    /// How request days are counted against the pool.
    #[serde(default)]
    pub counting_method: CountingMethod,
}

/// Parental leave policies by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentalLeavePolicies {
    /// Maternity leave policy.
    #[serde(default)]
    pub maternity: ParentalLeavePolicy,
    /// Paternity leave policy.
    #[serde(default)]
    pub paternity: ParentalLeavePolicy,
}

/// Per-team leave configuration.
///
/// # Example
///
/// ```
/// use leave_engine::models::TeamPolicy;
/// use rust_decimal::Decimal;
///
/// let policy = TeamPolicy::new(Decimal::from(20));
/// assert!(!policy.allow_carryover);
/// assert_eq!(policy.concurrent_limit(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPolicy {
    /// Identifier of the team this policy belongs to.
    #[serde(default)]
    pub team_id: String,
    /// Ordinary pool entitlement per policy year.
    pub max_leave_per_year: Decimal,
    /// Whether unused ordinary leave may roll into the next year.
    #[serde(default)]
    pub allow_carryover: bool,
    /// Maximum days that may carry over.
    #[serde(default)]
    pub carryover_cap: Option<Decimal>,
    /// Months (1-12) of the next year in which carried-over days may be used.
    #[serde(default)]
    pub carryover_eligible_months: Option<Vec<u32>>,
    /// Date after which carried-over days can no longer be used.
    #[serde(default)]
    pub carryover_expiry_date: Option<NaiveDate>,
    /// Parental leave policies.
    #[serde(default)]
    pub parental_leave_policy: ParentalLeavePolicies,
    /// Maximum members of one shift-sharing group on approved leave per day.
    #[serde(default)]
    pub concurrent_leave_limit: Option<u32>,
    /// Whether analytics are additionally grouped by subgroup tag.
    #[serde(default)]
    pub enable_subgrouping: bool,
    /// Known subgroup names.
    #[serde(default)]
    pub subgroups: Vec<String>,
}

impl TeamPolicy {
    /// Creates a policy with the given ordinary entitlement and everything else off.
    pub fn new(max_leave_per_year: Decimal) -> Self {
        Self {
            team_id: String::new(),
            max_leave_per_year,
            allow_carryover: false,
            carryover_cap: None,
            carryover_eligible_months: None,
            carryover_expiry_date: None,
            parental_leave_policy: ParentalLeavePolicies::default(),
            concurrent_leave_limit: None,
            enable_subgrouping: false,
            subgroups: Vec::new(),
        }
    }

    /// Returns the concurrent-leave ceiling, or `None` when sharing is unconstrained.
    ///
    /// A limit of zero means the team has not configured one.
    pub fn concurrent_limit(&self) -> Option<u32> {
        self.concurrent_leave_limit.filter(|limit| *limit > 0)
    }

    /// Returns the enabled policy for a parental leave type.
    pub fn parental_policy(&self, leave_type: ParentalLeaveType) -> Option<&ParentalLeavePolicy> {
        let policy = match leave_type {
            ParentalLeaveType::Maternity => &self.parental_leave_policy.maternity,
            ParentalLeaveType::Paternity => &self.parental_leave_policy.paternity,
            ParentalLeaveType::None => return None,
        };
        policy.enabled.then_some(policy)
    }

    /// Returns true if `subgroup` is one of the team's configured subgroups.
    pub fn has_subgroup(&self, subgroup: &str) -> bool {
        self.subgroups.iter().any(|s| s == subgroup)
    }

    /// Checks that every value is within its allowed range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_leave_per_year < Decimal::ZERO {
            return Err(invalid("max_leave_per_year", "must not be negative"));
        }

        if let Some(cap) = self.carryover_cap {
            if cap < Decimal::ZERO {
                return Err(invalid("carryover_cap", "must not be negative"));
            }
        }

        if let Some(months) = &self.carryover_eligible_months {
            if let Some(month) = months.iter().find(|m| !(1..=12).contains(*m)) {
                return Err(invalid(
                    "carryover_eligible_months",
                    &format!("month {} is outside 1-12", month),
                ));
            }
        }

        for (field, policy) in [
            ("parental_leave_policy.maternity.max_days", &self.parental_leave_policy.maternity),
            ("parental_leave_policy.paternity.max_days", &self.parental_leave_policy.paternity),
        ] {
            if policy.max_days < Decimal::ZERO {
                return Err(invalid(field, "must not be negative"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidPolicy {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// The calendar year that balances and capacity are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyYear {
    /// First day of the year (inclusive).
    pub start: NaiveDate,
    /// Last day of the year (inclusive).
    pub end: NaiveDate,
}

impl PolicyYear {
    /// Returns the policy year containing `date`.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::PolicyYear;
    /// use chrono::NaiveDate;
    ///
    /// let year = PolicyYear::containing(NaiveDate::from_ymd_opt(2026, 7, 14).unwrap());
    /// assert_eq!(year.start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    /// assert_eq!(year.end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    /// ```
    pub fn containing(date: NaiveDate) -> Self {
        Self::for_year(date.year())
    }

    /// Returns the policy year that follows this one.
    pub fn next(&self) -> Self {
        Self::for_year(self.start.year() + 1)
    }

    /// Clips an inclusive date range to this year.
    ///
    /// Returns `None` when the range lies outside the year or is inverted.
    pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let clipped_start = start.max(self.start);
        let clipped_end = end.min(self.end);
        (clipped_start <= clipped_end).then_some((clipped_start, clipped_end))
    }

    fn for_year(year: i32) -> Self {
        // January 1st and December 31st exist for every year chrono can represent.
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }
}
