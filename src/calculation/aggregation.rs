//! Aggregation of member analytics into group and team views.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AnalyticsAggregate, GroupAnalytics, GroupKey, GroupedTeamAnalytics, MemberAnalytics, ShiftTag,
};

/// Default fraction of the yearly entitlement below which a member is at risk.
pub const DEFAULT_AT_RISK_FRACTION: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Returns true if a member is projected to lose days or is running low.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::{DEFAULT_AT_RISK_FRACTION, is_at_risk};
/// use rust_decimal::Decimal;
///
/// // 4 of 20 days left is below a quarter of the entitlement
/// assert!(is_at_risk(Decimal::from(4), Decimal::ZERO, Decimal::from(20), DEFAULT_AT_RISK_FRACTION));
/// assert!(!is_at_risk(Decimal::from(5), Decimal::ZERO, Decimal::from(20), DEFAULT_AT_RISK_FRACTION));
/// assert!(is_at_risk(Decimal::from(18), Decimal::from(2), Decimal::from(20), DEFAULT_AT_RISK_FRACTION));
/// ```
pub fn is_at_risk(
    remaining_balance: Decimal,
    will_lose: Decimal,
    max_leave_per_year: Decimal,
    at_risk_fraction: Decimal,
) -> bool {
    will_lose > Decimal::ZERO || remaining_balance < at_risk_fraction * max_leave_per_year
}

fn add_to(total: &mut Decimal, value: Decimal, field: &str) -> EngineResult<()> {
    *total = total
        .checked_add(value)
        .ok_or_else(|| EngineError::InvariantViolation {
            message: format!("{} overflowed while aggregating", field),
        })?;
    Ok(())
}

/// Sums, averages, and counts over a set of members.
///
/// Group remainders are shared by every member of a shift-sharing group, so
/// each (fingerprint, shift tag) pair contributes its remainder once. An
/// empty set produces a zeroed aggregate.
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] if a total does not fit in a
/// `Decimal`.
pub fn aggregate_members(
    members: &[MemberAnalytics],
    max_leave_per_year: Decimal,
    at_risk_fraction: Decimal,
) -> EngineResult<AnalyticsAggregate> {
    if members.is_empty() {
        return Ok(AnalyticsAggregate::default());
    }

    let mut aggregate = AnalyticsAggregate {
        member_count: members.len() as u32,
        ..AnalyticsAggregate::default()
    };
    let mut seen_groups: BTreeSet<(&str, ShiftTag)> = BTreeSet::new();

    for member in members {
        add_to(&mut aggregate.total_base_balance, member.base_balance, "total_base_balance")?;
        add_to(
            &mut aggregate.total_remaining_balance,
            member.remaining_balance,
            "total_remaining_balance",
        )?;
        add_to(
            &mut aggregate.total_surplus_balance,
            member.surplus_balance,
            "total_surplus_balance",
        )?;
        add_to(
            &mut aggregate.total_realistic_usable_days,
            member.realistic_usable_days,
            "total_realistic_usable_days",
        )?;
        add_to(&mut aggregate.total_will_carryover, member.will_carryover, "total_will_carryover")?;
        add_to(&mut aggregate.total_will_lose, member.will_lose, "total_will_lose")?;

        if seen_groups.insert((member.working_days_fingerprint.as_str(), member.shift_tag)) {
            add_to(
                &mut aggregate.total_remainder_days,
                member.group_remainder_days,
                "total_remainder_days",
            )?;
        }
        if is_at_risk(
            member.remaining_balance,
            member.will_lose,
            max_leave_per_year,
            at_risk_fraction,
        ) {
            aggregate.members_at_risk += 1;
        }
        if member.has_partial_competition {
            aggregate.members_with_partial_competition += 1;
        }
    }

    let count = Decimal::from(aggregate.member_count);
    aggregate.average_remaining_balance = (aggregate.total_remaining_balance / count).round_dp(2);
    aggregate.average_realistic_usable_days =
        (aggregate.total_realistic_usable_days / count).round_dp(2);

    Ok(aggregate)
}

/// Groups member analytics by [`GroupKey`] and aggregates each group and the team.
///
/// Groups are ordered by key and members within a group by member ID.
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] if a total does not fit in a
/// `Decimal`.
pub fn group_team_analytics(
    members: Vec<MemberAnalytics>,
    max_leave_per_year: Decimal,
    at_risk_fraction: Decimal,
) -> EngineResult<GroupedTeamAnalytics> {
    let aggregate = aggregate_members(&members, max_leave_per_year, at_risk_fraction)?;

    let mut grouped: BTreeMap<GroupKey, Vec<MemberAnalytics>> = BTreeMap::new();
    for member in members {
        let key = GroupKey {
            working_days_fingerprint: member.working_days_fingerprint.clone(),
            shift_tag: member.shift_tag,
            subgroup_tag: member.subgroup_tag.clone(),
        };
        grouped.entry(key).or_default().push(member);
    }

    let groups = grouped
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_by(|a, b| a.member_id.cmp(&b.member_id));
            let aggregate = aggregate_members(&members, max_leave_per_year, at_risk_fraction)?;
            Ok(GroupAnalytics {
                key,
                members,
                aggregate,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(GroupedTeamAnalytics { aggregate, groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_member(
        id: &str,
        fingerprint: &str,
        tag: ShiftTag,
        remaining: &str,
        will_lose: &str,
        group_remainder: &str,
    ) -> MemberAnalytics {
        MemberAnalytics {
            member_id: id.to_string(),
            working_days_fingerprint: fingerprint.to_string(),
            shift_tag: tag,
            subgroup_tag: None,
            base_balance: dec("20"),
            remaining_balance: dec(remaining),
            surplus_balance: Decimal::ZERO,
            working_days_used_this_year: dec("20") - dec(remaining),
            theoretical_working_days_remaining: 50,
            usable_days: 50,
            realistic_usable_days: dec(remaining).max(Decimal::ZERO),
            members_sharing_same_shift: 1,
            average_days_per_member: dec("50"),
            will_carryover: Decimal::ZERO,
            will_lose: dec(will_lose),
            realistic_carryover_usable_days: Decimal::ZERO,
            has_partial_competition: false,
            partial_overlap_members_with_balance: 0,
            group_remainder_days: dec(group_remainder),
            pending_requests: 0,
            parental: None,
            audit_trace: vec![],
        }
    }

    #[test]
    fn test_empty_aggregate_is_zeroed() {
        let aggregate = aggregate_members(&[], dec("20"), DEFAULT_AT_RISK_FRACTION).unwrap();
        assert_eq!(aggregate, AnalyticsAggregate::default());
        assert_eq!(aggregate.average_remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_sums_and_averages() {
        let members = vec![
            create_member("m_001", "W:1111100", ShiftTag::Day, "10", "0", "30"),
            create_member("m_002", "W:1111100", ShiftTag::Day, "5", "0", "30"),
            create_member("m_003", "W:1111100", ShiftTag::Day, "0", "0", "30"),
        ];
        let aggregate = aggregate_members(&members, dec("20"), DEFAULT_AT_RISK_FRACTION).unwrap();
        assert_eq!(aggregate.member_count, 3);
        assert_eq!(aggregate.total_base_balance, dec("60"));
        assert_eq!(aggregate.total_remaining_balance, dec("15"));
        assert_eq!(aggregate.average_remaining_balance, dec("5"));
        // Shared remainder counted once
        assert_eq!(aggregate.total_remainder_days, dec("30"));
    }

    #[test]
    fn test_average_is_rounded_to_two_places() {
        let members = vec![
            create_member("m_001", "W:1111100", ShiftTag::Day, "10", "0", "0"),
            create_member("m_002", "W:1111100", ShiftTag::Day, "10", "0", "0"),
            create_member("m_003", "W:1111100", ShiftTag::Day, "0", "0", "0"),
        ];
        let aggregate = aggregate_members(&members, dec("20"), DEFAULT_AT_RISK_FRACTION).unwrap();
        assert_eq!(aggregate.average_remaining_balance, dec("6.67"));
    }

    #[test]
    fn test_at_risk_counts() {
        let members = vec![
            // Low balance
            create_member("m_001", "W:1111100", ShiftTag::Day, "4", "0", "0"),
            // Projected loss
            create_member("m_002", "W:1111100", ShiftTag::Day, "18", "3", "0"),
            // Healthy
            create_member("m_003", "W:1111100", ShiftTag::Day, "12", "0", "0"),
        ];
        let aggregate = aggregate_members(&members, dec("20"), DEFAULT_AT_RISK_FRACTION).unwrap();
        assert_eq!(aggregate.members_at_risk, 2);
        assert_eq!(aggregate.total_will_lose, dec("3"));
    }

    #[test]
    fn test_grouping_by_fingerprint_and_tag() {
        let members = vec![
            create_member("m_003", "W:1111100", ShiftTag::Day, "10", "0", "5"),
            create_member("m_001", "W:1111100", ShiftTag::Day, "10", "0", "5"),
            create_member("m_002", "W:1111100", ShiftTag::Night, "10", "0", "7"),
            create_member("m_004", "R8:11110000", ShiftTag::Night, "10", "0", "2"),
        ];
        let grouped = group_team_analytics(members, dec("20"), DEFAULT_AT_RISK_FRACTION).unwrap();

        assert_eq!(grouped.groups.len(), 3);
        assert_eq!(grouped.aggregate.member_count, 4);
        assert_eq!(grouped.aggregate.total_remainder_days, dec("14"));

        let day_key = GroupKey {
            working_days_fingerprint: "W:1111100".to_string(),
            shift_tag: ShiftTag::Day,
            subgroup_tag: None,
        };
        let day_group = grouped.group(&day_key).unwrap();
        assert_eq!(day_group.members[0].member_id, "m_001");
        assert_eq!(day_group.members[1].member_id, "m_003");
        assert_eq!(day_group.aggregate.member_count, 2);
        assert_eq!(day_group.aggregate.total_remainder_days, dec("5"));

        assert!(grouped.member("m_004").is_some());
    }

    #[test]
    fn test_subgroups_split_groups_but_share_remainder() {
        let mut a = create_member("m_001", "W:1111100", ShiftTag::Day, "10", "0", "6");
        a.subgroup_tag = Some("ward_a".to_string());
        let mut b = create_member("m_002", "W:1111100", ShiftTag::Day, "10", "0", "6");
        b.subgroup_tag = Some("ward_b".to_string());

        let grouped =
            group_team_analytics(vec![a, b], dec("20"), DEFAULT_AT_RISK_FRACTION).unwrap();
        assert_eq!(grouped.groups.len(), 2);
        assert_eq!(grouped.aggregate.total_remainder_days, dec("6"));
        assert_eq!(grouped.groups[0].key.subgroup_tag.as_deref(), Some("ward_a"));
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let mut a = create_member("m_001", "W:1111100", ShiftTag::Day, "5", "0", "0");
        a.remaining_balance = Decimal::MAX;
        let mut b = a.clone();
        b.member_id = "m_002".to_string();

        match aggregate_members(&[a, b], dec("20"), DEFAULT_AT_RISK_FRACTION) {
            Err(EngineError::InvariantViolation { message }) => {
                assert!(message.contains("total_remaining_balance"))
            }
            other => panic!("Expected InvariantViolation, got {:?}", other),
        }
    }
}
