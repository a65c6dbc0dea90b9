//! Team analytics runs.
//!
//! A run takes a complete [`TeamSnapshot`] and an explicit `today`, evaluates
//! every member, and returns a [`TeamAnalyticsReport`]. Members whose shift
//! schedule cannot be evaluated are left out of the analytics and listed as
//! failures; the rest of the team is still reported.
//!
//! Each member's audit trace is numbered: 1 balance, 2 capacity,
//! 3 projection, and 4 parental balance when the member has one.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    LeaveRequest, LeaveStatus, Member, MemberAnalytics, MemberFailure, PolicyYear, ShiftTag,
    TeamAnalyticsReport, TeamPolicy, TeamSnapshot,
};

use super::{
    BalanceResult, CapacityParticipant, ParentalBalanceResult, ShiftCalendar,
    allocate_group_capacity, calculate_ordinary_balance, calculate_parental_balance,
    calculate_projection, carryover_capacity, group_team_analytics,
};

/// Everything a run needs besides the snapshot itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsContext {
    /// The date the run treats as today. The engine never reads the clock.
    pub today: NaiveDate,
    /// Engine-wide settings.
    pub settings: EngineSettings,
}

impl AnalyticsContext {
    /// Creates a context for `today` with default settings.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            settings: EngineSettings::default(),
        }
    }

    /// Replaces the engine settings.
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }
}

struct EvaluatedMember<'a> {
    member: &'a Member,
    calendar: ShiftCalendar<'a>,
    fingerprint: String,
    subgroup_tag: Option<String>,
    pending_requests: u32,
    balance: BalanceResult,
    parental: Option<ParentalBalanceResult>,
    participant: CapacityParticipant<'a>,
}

/// Computes analytics for every member of a team.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPolicy`] if the team policy is out of range,
/// and [`EngineError::InvariantViolation`] if team totals overflow.
/// Invalid member schedules are not errors; those members are reported in
/// [`TeamAnalyticsReport::failures`].
///
/// # Example
///
/// ```
/// use leave_engine::calculation::{AnalyticsContext, calculate_team_analytics};
/// use leave_engine::models::{Member, ShiftSchedule, TeamPolicy, TeamSnapshot};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let snapshot = TeamSnapshot {
///     policy: TeamPolicy::new(Decimal::from(20)),
///     members: vec![Member::new("m_001", ShiftSchedule::weekdays())],
///     requests: vec![],
/// };
/// let ctx = AnalyticsContext::new(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
///
/// let report = calculate_team_analytics(&snapshot, &ctx).unwrap();
/// assert!(report.is_complete());
/// let member = report.analytics.member("m_001").unwrap();
/// assert_eq!(member.remaining_balance, Decimal::from(20));
/// assert_eq!(member.audit_trace.len(), 3);
/// ```
pub fn calculate_team_analytics(
    snapshot: &TeamSnapshot,
    ctx: &AnalyticsContext,
) -> EngineResult<TeamAnalyticsReport> {
    let start_time = Instant::now();
    let run_id = Uuid::new_v4();
    let policy = &snapshot.policy;

    info!(
        run_id = %run_id,
        team_id = %policy.team_id,
        as_of = %ctx.today,
        member_count = snapshot.members.len(),
        "Starting team analytics run"
    );

    if let Err(err) = policy.validate() {
        warn!(run_id = %run_id, team_id = %policy.team_id, error = %err, "Team policy rejected");
        return Err(err);
    }

    let year = PolicyYear::containing(ctx.today);
    let requests_by_member = index_requests(snapshot, &run_id);

    let mut failures = Vec::new();
    let mut evaluated = Vec::with_capacity(snapshot.members.len());
    for member in &snapshot.members {
        let requests = requests_by_member
            .get(member.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        match evaluate_member(member, requests, policy, &year) {
            Ok(member_eval) => evaluated.push(member_eval),
            Err(err) => {
                warn!(
                    run_id = %run_id,
                    member_id = %member.id,
                    error = %err,
                    "Member omitted from analytics"
                );
                failures.push(MemberFailure {
                    member_id: member.id.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    let mut shift_groups: BTreeMap<(&str, ShiftTag), Vec<usize>> = BTreeMap::new();
    for (index, member_eval) in evaluated.iter().enumerate() {
        shift_groups
            .entry((member_eval.fingerprint.as_str(), member_eval.member.shift_tag))
            .or_default()
            .push(index);
    }

    let concurrent_limit = policy.concurrent_limit();
    let mut member_analytics = Vec::with_capacity(evaluated.len());
    for ((fingerprint, shift_tag), indices) in &shift_groups {
        let group: Vec<CapacityParticipant> = indices
            .iter()
            .map(|i| evaluated[*i].participant.clone())
            .collect();
        let others: Vec<CapacityParticipant> = evaluated
            .iter()
            .filter(|e| e.member.shift_tag != *shift_tag)
            .map(|e| e.participant.clone())
            .collect();

        let capacity =
            allocate_group_capacity(&group, &others, ctx.today, year.end, concurrent_limit, 2)?;

        debug!(
            run_id = %run_id,
            fingerprint = %fingerprint,
            shift_tag = %shift_tag,
            members = capacity.members_sharing_same_shift,
            usable_days = capacity.usable_days,
            saturated_days = capacity.saturated_days,
            remainder_days = %capacity.remainder_days,
            "Allocated group capacity"
        );

        for (index, member_capacity) in indices.iter().zip(capacity.members) {
            let member_eval = &evaluated[*index];
            let window = carryover_capacity(
                policy,
                &member_eval.calendar,
                &year,
                capacity.members_sharing_same_shift,
                capacity.constrained,
            );
            let projection = calculate_projection(
                policy,
                member_eval.balance.remaining_balance,
                member_capacity.realistic_usable_days,
                window,
                3,
            );

            let mut audit_trace = vec![
                member_eval.balance.audit_step.clone(),
                member_capacity.audit_step,
                projection.audit_step,
            ];
            if let Some(parental) = &member_eval.parental {
                audit_trace.push(parental.audit_step.clone());
            }

            member_analytics.push(MemberAnalytics {
                member_id: member_eval.member.id.clone(),
                working_days_fingerprint: member_eval.fingerprint.clone(),
                shift_tag: member_eval.member.shift_tag,
                subgroup_tag: member_eval.subgroup_tag.clone(),
                base_balance: member_eval.balance.base_balance,
                remaining_balance: member_eval.balance.remaining_balance,
                surplus_balance: member_eval.balance.surplus_balance,
                working_days_used_this_year: member_eval.balance.days_used_this_year,
                theoretical_working_days_remaining: member_capacity
                    .theoretical_working_days_remaining,
                usable_days: member_capacity.usable_days,
                realistic_usable_days: member_capacity.realistic_usable_days,
                members_sharing_same_shift: capacity.members_sharing_same_shift,
                average_days_per_member: capacity.average_days_per_member,
                will_carryover: projection.will_carryover,
                will_lose: projection.will_lose,
                realistic_carryover_usable_days: projection.realistic_carryover_usable_days,
                has_partial_competition: capacity.has_partial_competition,
                partial_overlap_members_with_balance: capacity
                    .partial_overlap_members_with_balance,
                group_remainder_days: capacity.remainder_days,
                pending_requests: member_eval.pending_requests,
                parental: member_eval.parental.as_ref().map(|p| p.balance.clone()),
                audit_trace,
            });
        }
    }

    let analytics = match group_team_analytics(
        member_analytics,
        policy.max_leave_per_year,
        ctx.settings.at_risk_fraction,
    ) {
        Ok(analytics) => analytics,
        Err(err) => {
            warn!(run_id = %run_id, team_id = %policy.team_id, error = %err, "Aggregation failed");
            return Err(err);
        }
    };
    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        run_id = %run_id,
        team_id = %policy.team_id,
        as_of = %ctx.today,
        member_count = analytics.aggregate.member_count,
        group_count = analytics.groups.len(),
        failure_count = failures.len(),
        duration_us = duration_us,
        "Team analytics run completed"
    );

    Ok(TeamAnalyticsReport {
        run_id,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        team_id: policy.team_id.clone(),
        as_of: ctx.today,
        analytics,
        failures,
        duration_us,
    })
}

/// Computes analytics for one member.
///
/// The member is evaluated in the context of the whole team, since capacity
/// depends on everyone sharing their shift.
///
/// # Errors
///
/// Returns [`EngineError::MemberNotFound`] if the member is not in the
/// snapshot, and [`EngineError::InvalidSchedule`] if their schedule cannot be
/// evaluated.
pub fn calculate_member_analytics(
    snapshot: &TeamSnapshot,
    member_id: &str,
    ctx: &AnalyticsContext,
) -> EngineResult<MemberAnalytics> {
    let member = snapshot
        .member(member_id)
        .ok_or_else(|| EngineError::MemberNotFound {
            member_id: member_id.to_string(),
        })?;
    ShiftCalendar::new(&member.shift_schedule)?;

    let report = calculate_team_analytics(snapshot, ctx)?;
    report
        .analytics
        .member(member_id)
        .cloned()
        .ok_or_else(|| EngineError::InvariantViolation {
            message: format!("member {} missing from team analytics", member_id),
        })
}

/// Indexes requests by member, dropping requests for members not on the team.
fn index_requests<'a>(
    snapshot: &'a TeamSnapshot,
    run_id: &Uuid,
) -> HashMap<&'a str, Vec<&'a LeaveRequest>> {
    let known: HashSet<&str> = snapshot.members.iter().map(|m| m.id.as_str()).collect();
    let mut by_member: HashMap<&str, Vec<&LeaveRequest>> = HashMap::new();

    for request in &snapshot.requests {
        if known.contains(request.member_id.as_str()) {
            by_member
                .entry(request.member_id.as_str())
                .or_default()
                .push(request);
        } else {
            warn!(
                run_id = %run_id,
                request_id = %request.id,
                member_id = %request.member_id,
                "Ignoring leave request for unknown member"
            );
        }
    }

    by_member
}

fn evaluate_member<'a>(
    member: &'a Member,
    requests: &[&'a LeaveRequest],
    policy: &TeamPolicy,
    year: &PolicyYear,
) -> EngineResult<EvaluatedMember<'a>> {
    let calendar = ShiftCalendar::new(&member.shift_schedule)?;

    let balance = calculate_ordinary_balance(
        policy.max_leave_per_year,
        requests,
        &calendar,
        year,
        &member.ordinary_override,
        member.parental_entitlement(),
        1,
    );

    let parental = member.parental_entitlement().and_then(|leave_type| {
        policy.parental_policy(leave_type).map(|parental_policy| {
            calculate_parental_balance(
                parental_policy,
                leave_type,
                requests,
                &calendar,
                year,
                &member.parental_override,
                4,
            )
        })
    });

    let approved_leave = requests
        .iter()
        .filter(|r| r.is_approved())
        .map(|r| (r.start_date, r.end_date))
        .collect();
    let pending_requests = requests
        .iter()
        .filter(|r| r.status == LeaveStatus::Pending)
        .count() as u32;

    Ok(EvaluatedMember {
        member,
        calendar,
        fingerprint: calendar.fingerprint(),
        subgroup_tag: resolve_subgroup(policy, member),
        pending_requests,
        participant: CapacityParticipant {
            member_id: &member.id,
            calendar,
            remaining_balance: balance.remaining_balance,
            approved_leave,
        },
        balance,
        parental,
    })
}

fn resolve_subgroup(policy: &TeamPolicy, member: &Member) -> Option<String> {
    if !policy.enable_subgrouping {
        return None;
    }
    let subgroup = member.subgroup_tag.as_deref()?;
    if policy.has_subgroup(subgroup) {
        Some(subgroup.to_string())
    } else {
        warn!(
            member_id = %member.id,
            subgroup_tag = %subgroup,
            "Unknown subgroup; member grouped without subgroup"
        );
        None
    }
}
