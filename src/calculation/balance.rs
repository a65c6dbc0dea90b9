//! Leave balance calculation.
//!
//! Balances are tracked in two independent pools: the ordinary pool, drawn
//! down by every approved non-parental request, and the parental pool, drawn
//! down only by requests of the member's configured parental leave type.
//!
//! ## Override precedence
//!
//! A leader-entered override is authoritative for its pool:
//! 1. `balance` replaces the remaining balance outright; anything above the
//!    entitlement is reported as surplus.
//! 2. Otherwise `year_to_date_used` replaces the computed usage.
//! 3. Otherwise usage is computed from approved requests in the policy year.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    AuditStep, CountingMethod, LeaveRequest, ManualOverride, ParentalBalance,
    ParentalLeavePolicy, ParentalLeaveType, PolicyYear,
};

use super::{ShiftCalendar, categorize_for, count_calendar_days};

/// The result of an ordinary pool balance calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult {
    /// The pool's entitlement for the year.
    pub base_balance: Decimal,
    /// Days left; negative when over-allocated.
    pub remaining_balance: Decimal,
    /// Leader-granted days above the entitlement.
    pub surplus_balance: Decimal,
    /// Days used so far this year.
    pub days_used_this_year: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of a parental pool balance calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentalBalanceResult {
    /// The parental pool figures.
    pub balance: ParentalBalance,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Where a pool's figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSource {
    /// Computed from approved requests.
    Computed,
    /// The leader's balance override.
    ManualBalance,
    /// The leader's year-to-date usage override.
    ManualYearToDateUsed,
}

impl BalanceSource {
    /// Returns the snake_case name used in audit output.
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceSource::Computed => "computed",
            BalanceSource::ManualBalance => "manual_balance",
            BalanceSource::ManualYearToDateUsed => "manual_year_to_date_used",
        }
    }
}

impl std::fmt::Display for BalanceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct PoolFigures {
    remaining: Decimal,
    surplus: Decimal,
    used: Decimal,
    source: BalanceSource,
}

fn apply_override(base: Decimal, computed_used: Decimal, manual: &ManualOverride) -> PoolFigures {
    match (manual.balance, manual.year_to_date_used) {
        (Some(balance), ytd) => PoolFigures {
            remaining: balance,
            surplus: (balance - base).max(Decimal::ZERO),
            used: ytd.unwrap_or_else(|| (base - balance).max(Decimal::ZERO)),
            source: BalanceSource::ManualBalance,
        },
        (None, Some(ytd)) => PoolFigures {
            remaining: base - ytd,
            surplus: Decimal::ZERO,
            used: ytd,
            source: BalanceSource::ManualYearToDateUsed,
        },
        (None, None) => PoolFigures {
            remaining: base - computed_used,
            surplus: Decimal::ZERO,
            used: computed_used,
            source: BalanceSource::Computed,
        },
    }
}

/// Calculates a member's ordinary pool balance for the policy year.
///
/// Every approved request whose category is not parental counts, measured in
/// the member's working days and clipped to `year`. Pending and rejected
/// requests never count.
///
/// # Arguments
///
/// * `max_leave_per_year` - The ordinary entitlement
/// * `requests` - The member's requests, in any status
/// * `calendar` - The member's shift calendar
/// * `year` - The policy year being evaluated
/// * `manual` - The member's ordinary pool override
/// * `parental_type` - The member's parental leave type, used to resolve
///   reasons that only say "parental"
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use leave_engine::calculation::{ShiftCalendar, calculate_ordinary_balance};
/// use leave_engine::models::{
///     LeaveRequest, LeaveStatus, ManualOverride, PolicyYear, ShiftSchedule,
/// };
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
///
/// let schedule = ShiftSchedule::weekdays();
/// let calendar = ShiftCalendar::new(&schedule).unwrap();
/// let request = LeaveRequest {
///     id: "req_001".to_string(),
///     member_id: "m_001".to_string(),
///     // Monday to Sunday: five working days
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
///     reason_text: "Annual leave".to_string(),
///     category: None,
///     status: LeaveStatus::Approved,
///     created_at: Utc::now(),
/// };
/// let year = PolicyYear::containing(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
///
/// let result = calculate_ordinary_balance(
///     Decimal::from(20),
///     &[&request],
///     &calendar,
///     &year,
///     &ManualOverride::default(),
///     None,
///     1,
/// );
///
/// assert_eq!(result.days_used_this_year, Decimal::from(5));
/// assert_eq!(result.remaining_balance, Decimal::from(15));
/// assert_eq!(result.surplus_balance, Decimal::ZERO);
/// ```
pub fn calculate_ordinary_balance(
    max_leave_per_year: Decimal,
    requests: &[&LeaveRequest],
    calendar: &ShiftCalendar,
    year: &PolicyYear,
    manual: &ManualOverride,
    parental_type: Option<ParentalLeaveType>,
    step_number: u32,
) -> BalanceResult {
    let counted: Vec<&LeaveRequest> = requests
        .iter()
        .copied()
        .filter(|r| r.is_approved() && !categorize_for(r, parental_type).is_parental())
        .collect();

    let computed_used: u32 = counted
        .iter()
        .filter_map(|r| year.clip(r.start_date, r.end_date))
        .map(|(start, end)| calendar.count_working_days(start, end))
        .sum();
    let computed_used = Decimal::from(computed_used);

    let figures = apply_override(max_leave_per_year, computed_used, manual);

    let reasoning = match figures.source {
        BalanceSource::ManualBalance => format!(
            "Manual balance override of {} days replaces computed balance",
            figures.remaining.normalize()
        ),
        BalanceSource::ManualYearToDateUsed => format!(
            "{} entitlement - {} days used (manual override) = {} remaining",
            max_leave_per_year.normalize(),
            figures.used.normalize(),
            figures.remaining.normalize()
        ),
        BalanceSource::Computed => format!(
            "{} entitlement - {} working days across {} approved requests = {} remaining",
            max_leave_per_year.normalize(),
            computed_used,
            counted.len(),
            figures.remaining.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "ordinary_balance".to_string(),
        rule_name: "Ordinary Leave Balance".to_string(),
        input: serde_json::json!({
            "max_leave_per_year": max_leave_per_year.normalize().to_string(),
            "approved_requests": counted.len(),
            "year_start": year.start.to_string(),
            "year_end": year.end.to_string(),
            "override_balance": manual.balance.map(|b| b.normalize().to_string()),
            "override_year_to_date_used": manual.year_to_date_used.map(|u| u.normalize().to_string())
        }),
        output: serde_json::json!({
            "remaining_balance": figures.remaining.normalize().to_string(),
            "surplus_balance": figures.surplus.normalize().to_string(),
            "days_used_this_year": figures.used.normalize().to_string(),
            "source": figures.source.as_str()
        }),
        reasoning,
    };

    BalanceResult {
        base_balance: max_leave_per_year,
        remaining_balance: figures.remaining,
        surplus_balance: figures.surplus,
        days_used_this_year: figures.used,
        audit_step,
    }
}

/// Calculates a member's parental pool balance for the policy year.
///
/// Only approved requests categorised as `leave_type` count. Days are measured
/// with the policy's counting method: rostered working days, or every calendar
/// day in the clipped range.
pub fn calculate_parental_balance(
    policy: &ParentalLeavePolicy,
    leave_type: ParentalLeaveType,
    requests: &[&LeaveRequest],
    calendar: &ShiftCalendar,
    year: &PolicyYear,
    manual: &ManualOverride,
    step_number: u32,
) -> ParentalBalanceResult {
    let counted: Vec<&LeaveRequest> = requests
        .iter()
        .copied()
        .filter(|r| {
            r.is_approved()
                && categorize_for(r, Some(leave_type)).parental_type() == Some(leave_type)
        })
        .collect();

    let computed_used: u32 = counted
        .iter()
        .filter_map(|r| year.clip(r.start_date, r.end_date))
        .map(|(start, end)| match policy.counting_method {
            CountingMethod::WorkingDays => calendar.count_working_days(start, end),
            CountingMethod::CalendarDays => count_calendar_days(start, end),
        })
        .sum();
    let computed_used = Decimal::from(computed_used);

    let figures = apply_override(policy.max_days, computed_used, manual);

    let (type_str, counting_str) = (
        match leave_type {
            ParentalLeaveType::Maternity => "maternity",
            ParentalLeaveType::Paternity => "paternity",
            ParentalLeaveType::None => "none",
        },
        match policy.counting_method {
            CountingMethod::WorkingDays => "working_days",
            CountingMethod::CalendarDays => "calendar_days",
        },
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "parental_balance".to_string(),
        rule_name: "Parental Leave Balance".to_string(),
        input: serde_json::json!({
            "leave_type": type_str,
            "max_days": policy.max_days.normalize().to_string(),
            "counting_method": counting_str,
            "approved_requests": counted.len(),
            "override_balance": manual.balance.map(|b| b.normalize().to_string()),
            "override_year_to_date_used": manual.year_to_date_used.map(|u| u.normalize().to_string())
        }),
        output: serde_json::json!({
            "remaining_balance": figures.remaining.normalize().to_string(),
            "surplus_balance": figures.surplus.normalize().to_string(),
            "days_used_this_year": figures.used.normalize().to_string(),
            "source": figures.source.as_str()
        }),
        reasoning: format!(
            "{} {} leave: {} days - {} used ({}) = {} remaining",
            type_str,
            counting_str,
            policy.max_days.normalize(),
            figures.used.normalize(),
            figures.source,
            figures.remaining.normalize()
        ),
    };

    ParentalBalanceResult {
        balance: ParentalBalance {
            leave_type,
            counting_method: policy.counting_method,
            base_balance: policy.max_days,
            remaining_balance: figures.remaining,
            surplus_balance: figures.surplus,
            days_used_this_year: figures.used,
        },
        audit_step,
    }
}
