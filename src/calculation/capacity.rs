//! Capacity allocation for shift-sharing groups.
//!
//! Members who work the same days on the same shift compete for one
//! concurrent-leave ceiling. This module scans the horizon (today to year
//! end) once per group, removes the days on which the ceiling is already
//! reached, and splits the remaining usable days fairly across the group.
//!
//! Members of other groups whose working days overlap this group's count
//! towards the ceiling on the days they share (their approved leave occupies
//! a slot), but they take no part in this group's fair-share split.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::{FairShareClaim, ShiftCalendar, days_inclusive, water_fill};

/// A member taking part in a capacity scan.
#[derive(Debug, Clone)]
pub struct CapacityParticipant<'a> {
    /// The member's ID.
    pub member_id: &'a str,
    /// The member's validated shift calendar.
    pub calendar: ShiftCalendar<'a>,
    /// The member's remaining ordinary balance.
    pub remaining_balance: Decimal,
    /// Inclusive date ranges of the member's approved leave, of any category.
    pub approved_leave: Vec<(NaiveDate, NaiveDate)>,
}

impl CapacityParticipant<'_> {
    /// Returns true if the member is on approved leave on `date`.
    pub fn is_on_leave(&self, date: NaiveDate) -> bool {
        self.approved_leave
            .iter()
            .any(|(start, end)| *start <= date && date <= *end)
    }
}

/// Capacity figures for one member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCapacity {
    /// The member's ID.
    pub member_id: String,
    /// The member's working days in the horizon, ignoring contention.
    pub theoretical_working_days_remaining: u32,
    /// The member's working days in the horizon that are not saturated.
    pub usable_days: u32,
    /// The member's fair share of the group's usable days.
    pub realistic_usable_days: Decimal,
    /// The audit step recording this member's allocation.
    pub audit_step: AuditStep,
}

/// The result of allocating one group's capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCapacity {
    /// Candidate days in the horizon on which the ceiling is not reached.
    pub usable_days: u32,
    /// Candidate days on which the ceiling is reached.
    pub saturated_days: u32,
    /// Number of members in the group.
    pub members_sharing_same_shift: u32,
    /// Usable days divided evenly across the group, to two decimal places.
    pub average_days_per_member: Decimal,
    /// Usable capacity nobody in the group can claim.
    pub remainder_days: Decimal,
    /// Whether a concurrent-leave ceiling applied.
    pub constrained: bool,
    /// True when members of other groups work some of the same days.
    pub has_partial_competition: bool,
    /// Overlapping members from other groups who still hold a positive balance.
    pub partial_overlap_members_with_balance: u32,
    /// Per-member figures, in the order the group was given.
    pub members: Vec<MemberCapacity>,
}

/// Allocates the usable days of a shift-sharing group between its members.
///
/// With a ceiling of `concurrent_limit`, a candidate day (a working day for at
/// least one group member) is saturated when the group members on leave that
/// day, plus overlapping `others` who work and are on leave that day, reach
/// the ceiling. Usable days are split by [`water_fill`] with each member's
/// demand capped by their remaining balance and their own usable days.
///
/// Without a ceiling every member is evaluated independently: usable days
/// equal theoretical days, and realistic usable days are the remaining balance
/// capped by theoretical days.
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] if `group` is empty.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::{CapacityParticipant, ShiftCalendar, allocate_group_capacity};
/// use leave_engine::models::ShiftSchedule;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let schedule = ShiftSchedule::weekdays();
/// let calendar = ShiftCalendar::new(&schedule).unwrap();
/// let group = vec![
///     CapacityParticipant {
///         member_id: "m_001",
///         calendar,
///         remaining_balance: Decimal::from(20),
///         approved_leave: vec![],
///     },
///     CapacityParticipant {
///         member_id: "m_002",
///         calendar,
///         remaining_balance: Decimal::from(20),
///         approved_leave: vec![],
///     },
/// ];
///
/// // Three weeks of weekdays: 15 usable days for two members
/// let start = NaiveDate::from_ymd_opt(2026, 12, 7).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
/// let result = allocate_group_capacity(&group, &[], start, end, Some(1), 2).unwrap();
///
/// assert_eq!(result.usable_days, 15);
/// assert_eq!(result.average_days_per_member, Decimal::new(75, 1));
/// assert_eq!(result.members[0].realistic_usable_days, Decimal::new(75, 1));
/// ```
pub fn allocate_group_capacity(
    group: &[CapacityParticipant],
    others: &[CapacityParticipant],
    horizon_start: NaiveDate,
    horizon_end: NaiveDate,
    concurrent_limit: Option<u32>,
    step_number: u32,
) -> EngineResult<GroupCapacity> {
    if group.is_empty() {
        return Err(EngineError::InvariantViolation {
            message: "capacity group has no members".to_string(),
        });
    }
    let group_size = group.len() as u32;

    let candidate_days: Vec<NaiveDate> = days_inclusive(horizon_start, horizon_end)
        .filter(|day| group.iter().any(|m| m.calendar.is_working_day(*day)))
        .collect();

    let mut overlapping = vec![false; others.len()];
    let mut saturated = vec![false; candidate_days.len()];
    for (day_index, day) in candidate_days.iter().enumerate() {
        let mut on_leave = group.iter().filter(|m| m.is_on_leave(*day)).count() as u32;
        for (other_index, other) in others.iter().enumerate() {
            if other.calendar.is_working_day(*day) {
                overlapping[other_index] = true;
                if other.is_on_leave(*day) {
                    on_leave += 1;
                }
            }
        }
        saturated[day_index] = concurrent_limit.is_some_and(|limit| on_leave >= limit);
    }

    let saturated_days = saturated.iter().filter(|s| **s).count() as u32;
    let usable_days = candidate_days.len() as u32 - saturated_days;
    let partial_overlap_members_with_balance = others
        .iter()
        .zip(&overlapping)
        .filter(|(other, overlaps)| **overlaps && other.remaining_balance > Decimal::ZERO)
        .count() as u32;
    let has_partial_competition = overlapping.iter().any(|o| *o);

    let theoretical: Vec<u32> = group
        .iter()
        .map(|m| m.calendar.count_working_days(horizon_start, horizon_end))
        .collect();

    let (member_usable, realistic, remainder_days): (Vec<u32>, Vec<Decimal>, Decimal) =
        match concurrent_limit {
            Some(_) => {
                let member_usable: Vec<u32> = group
                    .iter()
                    .map(|m| {
                        candidate_days
                            .iter()
                            .zip(&saturated)
                            .filter(|(day, sat)| !**sat && m.calendar.is_working_day(**day))
                            .count() as u32
                    })
                    .collect();
                let claims: Vec<FairShareClaim> = group
                    .iter()
                    .zip(&member_usable)
                    .map(|(m, usable)| FairShareClaim {
                        member_id: m.member_id.to_string(),
                        demand: m
                            .remaining_balance
                            .max(Decimal::ZERO)
                            .min(Decimal::from(*usable)),
                    })
                    .collect();
                let fill = water_fill(Decimal::from(usable_days), &claims);
                (member_usable, fill.allocations, fill.remainder)
            }
            None => {
                let realistic: Vec<Decimal> = group
                    .iter()
                    .zip(&theoretical)
                    .map(|(m, t)| m.remaining_balance.max(Decimal::ZERO).min(Decimal::from(*t)))
                    .collect();
                let remainder: Decimal = theoretical
                    .iter()
                    .zip(&realistic)
                    .map(|(t, r)| Decimal::from(*t) - *r)
                    .sum();
                (theoretical.clone(), realistic, remainder)
            }
        };

    let average_days_per_member = (Decimal::from(usable_days) / Decimal::from(group_size)).round_dp(2);
    let limit_str = concurrent_limit.map(|l| l.to_string());

    let members = group
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let reasoning = match concurrent_limit {
                Some(limit) => format!(
                    "{} of {} candidate days usable under a limit of {}; fair share of {} usable days across {} members, capped by {} remaining = {}",
                    usable_days,
                    candidate_days.len(),
                    limit,
                    usable_days,
                    group_size,
                    m.remaining_balance.normalize(),
                    realistic[i].normalize()
                ),
                None => format!(
                    "No concurrent limit: min({} remaining, {} working days) = {}",
                    m.remaining_balance.max(Decimal::ZERO).normalize(),
                    theoretical[i],
                    realistic[i].normalize()
                ),
            };

            MemberCapacity {
                member_id: m.member_id.to_string(),
                theoretical_working_days_remaining: theoretical[i],
                usable_days: member_usable[i],
                realistic_usable_days: realistic[i],
                audit_step: AuditStep {
                    step_number,
                    rule_id: "capacity_allocation".to_string(),
                    rule_name: "Shared Capacity Allocation".to_string(),
                    input: serde_json::json!({
                        "horizon_start": horizon_start.to_string(),
                        "horizon_end": horizon_end.to_string(),
                        "concurrent_leave_limit": limit_str,
                        "members_sharing_same_shift": group_size,
                        "remaining_balance": m.remaining_balance.normalize().to_string()
                    }),
                    output: serde_json::json!({
                        "theoretical_working_days_remaining": theoretical[i],
                        "usable_days": member_usable[i],
                        "saturated_days": saturated_days,
                        "realistic_usable_days": realistic[i].normalize().to_string(),
                        "has_partial_competition": has_partial_competition
                    }),
                    reasoning,
                },
            }
        })
        .collect();

    Ok(GroupCapacity {
        usable_days,
        saturated_days,
        members_sharing_same_shift: group_size,
        average_days_per_member,
        remainder_days,
        constrained: concurrent_limit.is_some(),
        has_partial_competition,
        partial_overlap_members_with_balance,
        members,
    })
}
