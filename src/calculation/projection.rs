//! Year-end carryover and forfeiture projection.
//!
//! ## Rules
//!
//! **Carryover disabled:** whatever the member cannot realistically use before
//! year end is lost: `will_lose = max(0, remaining - realistic)`.
//!
//! **Carryover enabled:** the non-negative remaining balance carries over up
//! to the cap, and anything above the cap is lost. Carried days the member
//! cannot use inside next year's window (eligible months, up to the expiry
//! date) are also counted as lost.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, PolicyYear, TeamPolicy};

use super::{ShiftCalendar, floor_to_unit};

/// The result of a carryover projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Days projected to roll into next year.
    pub will_carryover: Decimal,
    /// Days projected to be forfeited.
    pub will_lose: Decimal,
    /// Carried-over days the member can realistically use next year.
    pub realistic_carryover_usable_days: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns how many carried-over days a member could use next year.
///
/// Counts the member's working days in the year after `year` that fall in the
/// policy's eligible months and not after the expiry date. An expiry before
/// next year starts leaves no window at all. Members of a constrained group
/// share the window, so it is divided by the group size.
pub fn carryover_capacity(
    policy: &TeamPolicy,
    calendar: &ShiftCalendar,
    year: &PolicyYear,
    members_sharing_same_shift: u32,
    constrained: bool,
) -> Decimal {
    let next = year.next();
    let window_end = match policy.carryover_expiry_date {
        Some(expiry) if expiry < next.start => return Decimal::ZERO,
        Some(expiry) => expiry.min(next.end),
        None => next.end,
    };

    let months = policy.carryover_eligible_months.as_deref().unwrap_or(&[]);
    let days = Decimal::from(calendar.count_working_days_in_months(next.start, window_end, months));

    if constrained && members_sharing_same_shift > 1 {
        floor_to_unit(days / Decimal::from(members_sharing_same_shift))
    } else {
        days
    }
}

/// Projects carryover and forfeiture for one member.
///
/// # Arguments
///
/// * `policy` - The team policy (carryover switch and cap)
/// * `remaining_balance` - The member's remaining ordinary balance
/// * `realistic_usable_days` - The member's realistic usable days this year
/// * `carryover_capacity` - See [`carryover_capacity`]
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::calculate_projection;
/// use leave_engine::models::TeamPolicy;
/// use rust_decimal::Decimal;
///
/// let mut policy = TeamPolicy::new(Decimal::from(20));
///
/// // No carryover: 20 remaining, 12 usable, 8 lost
/// let result = calculate_projection(&policy, Decimal::from(20), Decimal::from(12), Decimal::ZERO, 3);
/// assert_eq!(result.will_lose, Decimal::from(8));
/// assert_eq!(result.will_carryover, Decimal::ZERO);
///
/// // Capped carryover: 5 carry over, 15 lost
/// policy.allow_carryover = true;
/// policy.carryover_cap = Some(Decimal::from(5));
/// let result = calculate_projection(&policy, Decimal::from(20), Decimal::from(12), Decimal::from(100), 3);
/// assert_eq!(result.will_carryover, Decimal::from(5));
/// assert_eq!(result.will_lose, Decimal::from(15));
/// ```
pub fn calculate_projection(
    policy: &TeamPolicy,
    remaining_balance: Decimal,
    realistic_usable_days: Decimal,
    carryover_capacity: Decimal,
    step_number: u32,
) -> ProjectionResult {
    let (will_carryover, will_lose, realistic_carryover, reasoning) = if !policy.allow_carryover {
        let lose = (remaining_balance - realistic_usable_days).max(Decimal::ZERO);
        (
            Decimal::ZERO,
            lose,
            Decimal::ZERO,
            format!(
                "Carryover disabled: max(0, {} remaining - {} realistic) = {} lost",
                remaining_balance.normalize(),
                realistic_usable_days.normalize(),
                lose.normalize()
            ),
        )
    } else {
        let candidate = remaining_balance.max(Decimal::ZERO);
        let carry = match policy.carryover_cap {
            Some(cap) => candidate.min(cap),
            None => candidate,
        };
        let over_cap = candidate - carry;
        let usable_next_year = carry.min(carryover_capacity.max(Decimal::ZERO));
        let shortfall = carry - usable_next_year;
        (
            carry,
            over_cap + shortfall,
            usable_next_year,
            format!(
                "Carryover enabled: {} carried (cap {}), {} over cap lost, {} of {} usable next year, {} unusable lost",
                carry.normalize(),
                policy
                    .carryover_cap
                    .map(|c| c.normalize().to_string())
                    .unwrap_or_else(|| "none".to_string()),
                over_cap.normalize(),
                usable_next_year.normalize(),
                carry.normalize(),
                shortfall.normalize()
            ),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "carryover_projection".to_string(),
        rule_name: "Carryover Projection".to_string(),
        input: serde_json::json!({
            "allow_carryover": policy.allow_carryover,
            "carryover_cap": policy.carryover_cap.map(|c| c.normalize().to_string()),
            "remaining_balance": remaining_balance.normalize().to_string(),
            "realistic_usable_days": realistic_usable_days.normalize().to_string(),
            "carryover_capacity": carryover_capacity.normalize().to_string()
        }),
        output: serde_json::json!({
            "will_carryover": will_carryover.normalize().to_string(),
            "will_lose": will_lose.normalize().to_string(),
            "realistic_carryover_usable_days": realistic_carryover.normalize().to_string()
        }),
        reasoning,
    };

    ProjectionResult {
        will_carryover,
        will_lose,
        realistic_carryover_usable_days: realistic_carryover,
        audit_step,
    }
}
