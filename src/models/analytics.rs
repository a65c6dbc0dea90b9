//! Analytics result models for the Leave Analytics Engine.
//!
//! This module contains the computed, never-persisted outputs of an analytics
//! run: per-member [`MemberAnalytics`], the grouped team view
//! [`GroupedTeamAnalytics`], and the [`TeamAnalyticsReport`] that wraps a run
//! together with any members that could not be evaluated.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CountingMethod, ParentalLeaveType, ShiftTag};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Balance figures for a member's parental leave pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentalBalance {
    /// Which parental pool these figures describe.
    pub leave_type: ParentalLeaveType,
    /// How request days were counted.
    pub counting_method: CountingMethod,
    /// The pool's entitlement for the year.
    pub base_balance: Decimal,
    /// Days left in the pool; negative when over-allocated.
    pub remaining_balance: Decimal,
    /// Leader-granted days above the entitlement.
    pub surplus_balance: Decimal,
    /// Days drawn from the pool so far this year.
    pub days_used_this_year: Decimal,
}

/// Computed analytics for one member in one run.
///
/// Constructed fresh on every run and never mutated afterwards. Negative
/// balances are meaningful (over-allocation) and safe to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAnalytics {
    /// The member these figures describe.
    pub member_id: String,
    /// Stable key of the member's effective working pattern.
    pub working_days_fingerprint: String,
    /// The member's shift assignment.
    pub shift_tag: ShiftTag,
    /// Subgroup used for grouping, if subgrouping is enabled and the tag is known.
    pub subgroup_tag: Option<String>,
    /// Ordinary pool entitlement.
    pub base_balance: Decimal,
    /// Ordinary days left this year.
    pub remaining_balance: Decimal,
    /// Leader-granted days above the entitlement.
    pub surplus_balance: Decimal,
    /// Ordinary days used so far this year.
    pub working_days_used_this_year: Decimal,
    /// Working days from today to year end, ignoring contention.
    pub theoretical_working_days_remaining: u32,
    /// Working days from today to year end not saturated by the group's leave.
    pub usable_days: u32,
    /// Fair share of usable days, capped by remaining balance.
    pub realistic_usable_days: Decimal,
    /// Size of the member's shift-sharing group, including the member.
    pub members_sharing_same_shift: u32,
    /// Usable days divided evenly across the group.
    pub average_days_per_member: Decimal,
    /// Days projected to roll into next year.
    pub will_carryover: Decimal,
    /// Days projected to be forfeited.
    pub will_lose: Decimal,
    /// Carried-over days that can realistically be used next year.
    pub realistic_carryover_usable_days: Decimal,
    /// True when members on other shifts work some of the same days.
    pub has_partial_competition: bool,
    /// Partially overlapping members who still hold a positive balance.
    pub partial_overlap_members_with_balance: u32,
    /// Capacity left unclaimed in the member's shift-sharing group.
    pub group_remainder_days: Decimal,
    /// Requests still awaiting a decision.
    pub pending_requests: u32,
    /// Parental pool figures, when the member has an enabled entitlement.
    pub parental: Option<ParentalBalance>,
    /// Every calculation step that produced these figures.
    pub audit_trace: Vec<AuditStep>,
}

/// Sums, averages, and counts over a set of members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsAggregate {
    /// Number of members in the set.
    pub member_count: u32,
    /// Sum of ordinary entitlements.
    pub total_base_balance: Decimal,
    /// Sum of remaining ordinary balances.
    pub total_remaining_balance: Decimal,
    /// Sum of surplus balances.
    pub total_surplus_balance: Decimal,
    /// Sum of realistic usable days.
    pub total_realistic_usable_days: Decimal,
    /// Sum of projected carryover.
    pub total_will_carryover: Decimal,
    /// Sum of projected forfeiture.
    pub total_will_lose: Decimal,
    /// Unclaimed shared capacity across the distinct shift-sharing groups.
    pub total_remainder_days: Decimal,
    /// Mean remaining balance (zero for an empty set).
    pub average_remaining_balance: Decimal,
    /// Mean realistic usable days (zero for an empty set).
    pub average_realistic_usable_days: Decimal,
    /// Members projected to lose days or running low on balance.
    pub members_at_risk: u32,
    /// Members whose group faces partial competition.
    pub members_with_partial_competition: u32,
}

/// Key identifying one analytics group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    /// Working-days fingerprint shared by the group.
    pub working_days_fingerprint: String,
    /// Shift tag shared by the group.
    pub shift_tag: ShiftTag,
    /// Subgroup shared by the group, when subgrouping is enabled.
    pub subgroup_tag: Option<String>,
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.subgroup_tag {
            Some(subgroup) => write!(
                f,
                "{}|{}|{}",
                self.working_days_fingerprint, self.shift_tag, subgroup
            ),
            None => write!(f, "{}|{}", self.working_days_fingerprint, self.shift_tag),
        }
    }
}

/// One group of the team breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAnalytics {
    /// The group's key.
    pub key: GroupKey,
    /// The group's members, ordered by member ID.
    pub members: Vec<MemberAnalytics>,
    /// Aggregate over the group's members.
    pub aggregate: AnalyticsAggregate,
}

/// Team-wide aggregate plus per-group breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedTeamAnalytics {
    /// Aggregate over every evaluated member.
    pub aggregate: AnalyticsAggregate,
    /// Groups ordered by key.
    pub groups: Vec<GroupAnalytics>,
}

impl GroupedTeamAnalytics {
    /// Looks up a group by key.
    pub fn group(&self, key: &GroupKey) -> Option<&GroupAnalytics> {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// Looks up a member's analytics across all groups.
    pub fn member(&self, member_id: &str) -> Option<&MemberAnalytics> {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter())
            .find(|m| m.member_id == member_id)
    }
}

/// A member omitted from a run because their figures could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFailure {
    /// The member that was omitted.
    pub member_id: String,
    /// Why the member could not be evaluated.
    pub message: String,
}

/// The complete result of a team analytics run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAnalyticsReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// The version of the engine that performed the run.
    pub engine_version: String,
    /// The team the run was for.
    pub team_id: String,
    /// The date the run treated as today.
    pub as_of: NaiveDate,
    /// The grouped analytics.
    pub analytics: GroupedTeamAnalytics,
    /// Members omitted from the analytics.
    pub failures: Vec<MemberFailure>,
    /// The total run duration in microseconds.
    pub duration_us: u64,
}

impl TeamAnalyticsReport {
    /// Returns true if every member was evaluated.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
