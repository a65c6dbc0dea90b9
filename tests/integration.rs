//! Integration tests for the Leave Analytics Engine.
//!
//! This test suite runs whole-team analytics over JSON snapshots and covers:
//! - Single members with and without carryover
//! - Shift-sharing groups under a concurrent-leave limit
//! - Partial overlap between shifts
//! - Leave classification
//! - Partial failures and configuration loading

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;

use leave_engine::calculation::{
    AnalyticsContext, calculate_member_analytics, calculate_team_analytics, categorize, classify,
};
use leave_engine::config::ConfigLoader;
use leave_engine::error::EngineError;
use leave_engine::models::{LeaveCategory, LeaveRequest, TeamSnapshot};

// =============================================================================
// Test Helpers
// =============================================================================

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn make_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

fn weekdays() -> Value {
    json!({ "kind": "fixed", "pattern": [true, true, true, true, true, false, false] })
}

fn create_member(id: &str, shift_tag: &str, schedule: Value) -> Value {
    json!({
        "id": id,
        "shift_schedule": schedule,
        "shift_tag": shift_tag
    })
}

fn create_request(id: &str, member_id: &str, start: &str, end: &str, reason: &str) -> Value {
    json!({
        "id": id,
        "member_id": member_id,
        "start_date": start,
        "end_date": end,
        "reason_text": reason,
        "status": "approved",
        "created_at": "2026-01-05T09:00:00Z"
    })
}

fn create_snapshot(policy: Value, members: Vec<Value>, requests: Vec<Value>) -> TeamSnapshot {
    serde_json::from_value(json!({
        "policy": policy,
        "members": members,
        "requests": requests
    }))
    .expect("Failed to build snapshot")
}

// =============================================================================
// SECTION 1: Single member
// =============================================================================

#[test]
fn test_single_member_without_carryover_loses_nothing() {
    // 20 days left and far more than 20 working days before year end
    let snapshot = create_snapshot(
        json!({ "team_id": "team_a", "max_leave_per_year": "20" }),
        vec![create_member("m_001", "day", weekdays())],
        vec![],
    );
    let ctx = AnalyticsContext::new(make_date("2026-10-19"));

    let member = calculate_member_analytics(&snapshot, "m_001", &ctx).unwrap();
    assert_eq!(member.remaining_balance, decimal("20"));
    assert_eq!(member.realistic_usable_days, decimal("20"));
    assert_eq!(member.will_lose, Decimal::ZERO);
    assert_eq!(member.will_carryover, Decimal::ZERO);
}

#[test]
fn test_single_member_with_uncapped_carryover_carries_everything() {
    let snapshot = create_snapshot(
        json!({
            "team_id": "team_a",
            "max_leave_per_year": "20",
            "allow_carryover": true
        }),
        vec![create_member("m_001", "day", weekdays())],
        vec![],
    );
    let ctx = AnalyticsContext::new(make_date("2026-10-19"));

    let member = calculate_member_analytics(&snapshot, "m_001", &ctx).unwrap();
    assert_eq!(member.will_carryover, decimal("20"));
    assert_eq!(member.realistic_carryover_usable_days, decimal("20"));
    assert_eq!(member.will_lose, Decimal::ZERO);
}

#[test]
fn test_used_leave_reduces_balance_and_theoretical_days() {
    let snapshot = create_snapshot(
        json!({ "team_id": "team_a", "max_leave_per_year": "20" }),
        vec![create_member("m_001", "day", weekdays())],
        vec![
            // Monday to Friday earlier in the year
            create_request("req_001", "m_001", "2026-03-02", "2026-03-06", "Annual leave"),
        ],
    );
    // Friday 2026-12-11: 15 weekdays to year end
    let ctx = AnalyticsContext::new(make_date("2026-12-11"));

    let member = calculate_member_analytics(&snapshot, "m_001", &ctx).unwrap();
    assert_eq!(member.working_days_used_this_year, decimal("5"));
    assert_eq!(member.remaining_balance, decimal("15"));
    assert_eq!(member.theoretical_working_days_remaining, 15);
    assert_eq!(member.realistic_usable_days, decimal("15"));
}

// =============================================================================
// SECTION 2: Shift-sharing groups
// =============================================================================

#[test]
fn test_two_members_share_fifteen_days_under_limit_of_one() {
    let snapshot = create_snapshot(
        json!({
            "team_id": "team_a",
            "max_leave_per_year": "20",
            "concurrent_leave_limit": 1
        }),
        vec![
            create_member("m_001", "day", weekdays()),
            create_member("m_002", "day", weekdays()),
        ],
        vec![],
    );
    // Friday 2026-12-11: 15 weekdays to year end
    let ctx = AnalyticsContext::new(make_date("2026-12-11"));

    let report = calculate_team_analytics(&snapshot, &ctx).unwrap();
    assert_eq!(report.analytics.groups.len(), 1);

    let group = &report.analytics.groups[0];
    assert_eq!(group.members.len(), 2);
    let mut combined = Decimal::ZERO;
    for member in &group.members {
        assert_eq!(member.usable_days, 15);
        assert_eq!(member.members_sharing_same_shift, 2);
        assert_eq!(member.average_days_per_member, decimal("7.5"));
        assert!(member.realistic_usable_days <= decimal("10"));
        combined += member.realistic_usable_days;
        // Without carryover the unusable share is lost
        assert_eq!(member.will_lose, decimal("12.5"));
    }
    assert!(combined <= decimal("15"));
    assert_eq!(group.aggregate.total_realistic_usable_days, decimal("15"));
    assert_eq!(group.aggregate.members_at_risk, 2);
}

#[test]
fn test_rotating_and_fixed_rosters_with_same_days_share_a_group() {
    let rotating = json!({
        "kind": "rotating",
        "pattern": [true, true, true, true, true, false, false],
        // A Monday
        "anchor_date": "2026-01-05"
    });
    let snapshot = create_snapshot(
        json!({
            "team_id": "team_a",
            "max_leave_per_year": "20",
            "concurrent_leave_limit": 1
        }),
        vec![
            create_member("m_001", "day", weekdays()),
            create_member("m_002", "day", rotating),
        ],
        vec![],
    );
    let ctx = AnalyticsContext::new(make_date("2026-12-11"));

    let report = calculate_team_analytics(&snapshot, &ctx).unwrap();
    assert_eq!(report.analytics.groups.len(), 1);
    assert_eq!(
        report.analytics.groups[0].key.working_days_fingerprint,
        "W:1111100"
    );
}

#[test]
fn test_partial_overlap_saturates_shared_days() {
    let weekend = json!({ "kind": "fixed", "pattern": [false, false, false, false, true, true, true] });
    let snapshot = create_snapshot(
        json!({
            "team_id": "team_a",
            "max_leave_per_year": "20",
            "concurrent_leave_limit": 1
        }),
        vec![
            create_member("m_001", "day", weekdays()),
            create_member("m_002", "night", weekend),
        ],
        vec![
            // The night member is away for the rest of the year
            create_request("req_001", "m_002", "2026-12-11", "2026-12-31", "Holiday"),
        ],
    );
    let ctx = AnalyticsContext::new(make_date("2026-12-11"));

    let report = calculate_team_analytics(&snapshot, &ctx).unwrap();
    assert_eq!(report.analytics.groups.len(), 2);

    let day = report.analytics.member("m_001").unwrap();
    assert!(day.has_partial_competition);
    assert_eq!(day.partial_overlap_members_with_balance, 1);
    // Fridays 11th, 18th and 25th are taken by the night member's leave
    assert_eq!(day.theoretical_working_days_remaining, 15);
    assert_eq!(day.usable_days, 12);
    assert_eq!(day.realistic_usable_days, decimal("12"));

    let night = report.analytics.member("m_002").unwrap();
    assert_eq!(night.remaining_balance, decimal("11"));
    assert_eq!(night.usable_days, 0);
    assert_eq!(night.realistic_usable_days, Decimal::ZERO);
    assert_eq!(report.analytics.aggregate.members_with_partial_competition, 2);
}

// =============================================================================
// SECTION 3: Classification
// =============================================================================

#[test]
fn test_annual_family_bereavement_leave_is_bereavement() {
    assert_eq!(
        classify("Annual family bereavement leave"),
        LeaveCategory::Bereavement
    );

    let request: LeaveRequest = serde_json::from_value(create_request(
        "req_001",
        "m_001",
        "2026-05-04",
        "2026-05-05",
        "Annual family bereavement leave",
    ))
    .unwrap();
    assert_eq!(categorize(&request), LeaveCategory::Bereavement);
}

#[test]
fn test_tagged_parental_request_uses_parental_pool() {
    let mut member = create_member("m_001", "day", weekdays());
    member["parental_leave_type"] = json!("maternity");
    let mut request = create_request("req_001", "m_001", "2026-03-02", "2026-03-15", "Time off");
    request["category"] = json!("maternity");

    let snapshot = create_snapshot(
        json!({
            "team_id": "team_a",
            "max_leave_per_year": "20",
            "parental_leave_policy": {
                "maternity": { "enabled": true, "max_days": "90", "counting_method": "calendar_days" }
            }
        }),
        vec![member],
        vec![request],
    );
    let ctx = AnalyticsContext::new(make_date("2026-10-19"));

    let member = calculate_member_analytics(&snapshot, "m_001", &ctx).unwrap();
    assert_eq!(member.remaining_balance, decimal("20"));
    let parental = member.parental.unwrap();
    assert_eq!(parental.days_used_this_year, decimal("14"));
    assert_eq!(parental.remaining_balance, decimal("76"));
}

// =============================================================================
// SECTION 4: Failures, overrides and output
// =============================================================================

#[test]
fn test_invalid_schedule_is_a_partial_failure() {
    let broken = json!({ "kind": "fixed", "pattern": [true, true, true] });
    let snapshot = create_snapshot(
        json!({ "team_id": "team_a", "max_leave_per_year": "20" }),
        vec![
            create_member("m_001", "day", weekdays()),
            create_member("m_002", "day", broken),
        ],
        vec![],
    );
    let ctx = AnalyticsContext::new(make_date("2026-10-19"));

    let report = calculate_team_analytics(&snapshot, &ctx).unwrap();
    assert!(!report.is_complete());
    assert_eq!(report.failures[0].member_id, "m_002");
    assert_eq!(report.analytics.aggregate.member_count, 1);

    match calculate_member_analytics(&snapshot, "m_002", &ctx) {
        Err(EngineError::InvalidSchedule { message }) => assert!(message.contains("7 entries")),
        other => panic!("Expected InvalidSchedule error, got {:?}", other),
    }
}

#[test]
fn test_manual_balance_override_reports_surplus() {
    let mut member = create_member("m_001", "day", weekdays());
    member["ordinary_override"] = json!({ "balance": "24" });
    let snapshot = create_snapshot(
        json!({ "team_id": "team_a", "max_leave_per_year": "20" }),
        vec![member],
        vec![create_request("req_001", "m_001", "2026-03-02", "2026-03-06", "Holiday")],
    );
    let ctx = AnalyticsContext::new(make_date("2026-10-19"));

    let member = calculate_member_analytics(&snapshot, "m_001", &ctx).unwrap();
    assert_eq!(member.remaining_balance, decimal("24"));
    assert_eq!(member.surplus_balance, decimal("4"));
    assert_eq!(member.audit_trace[0].output["source"], "manual_balance");
}

#[test]
fn test_fractional_override_is_unaffected_by_a_limit() {
    let mut member = create_member("m_001", "day", weekdays());
    member["ordinary_override"] = json!({ "balance": "4.555" });
    let ctx = AnalyticsContext::new(make_date("2026-10-19"));

    let run = |limit: u32| {
        let snapshot = create_snapshot(
            json!({
                "team_id": "team_a",
                "max_leave_per_year": "10",
                "concurrent_leave_limit": limit
            }),
            vec![member.clone()],
            vec![],
        );
        calculate_team_analytics(&snapshot, &ctx).unwrap()
    };
    let unconstrained = run(0);
    let constrained = run(1);

    for report in [&unconstrained, &constrained] {
        let analytics = report.analytics.member("m_001").unwrap();
        assert_eq!(analytics.realistic_usable_days, decimal("4.555"));
        assert_eq!(analytics.will_lose, Decimal::ZERO);
        assert_eq!(report.analytics.aggregate.members_at_risk, 0);
    }
}

#[test]
fn test_overflowing_overrides_fail_the_run() {
    let mut a = create_member("m_001", "day", weekdays());
    a["ordinary_override"] = json!({ "balance": Decimal::MAX.to_string() });
    let mut b = a.clone();
    b["id"] = json!("m_002");
    let snapshot = create_snapshot(
        json!({ "team_id": "team_a", "max_leave_per_year": "20" }),
        vec![a, b],
        vec![],
    );
    let ctx = AnalyticsContext::new(make_date("2026-10-19"));

    match calculate_team_analytics(&snapshot, &ctx) {
        Err(EngineError::InvariantViolation { message }) => assert!(message.contains("overflowed")),
        other => panic!("Expected InvariantViolation, got {:?}", other),
    }
}

#[test]
fn test_untagged_parental_reason_uses_member_type() {
    let mut member = create_member("m_001", "day", weekdays());
    member["parental_leave_type"] = json!("paternity");
    let snapshot = create_snapshot(
        json!({
            "team_id": "team_a",
            "max_leave_per_year": "20",
            "parental_leave_policy": {
                "paternity": { "enabled": true, "max_days": "10", "counting_method": "working_days" }
            }
        }),
        vec![member],
        vec![create_request("req_001", "m_001", "2026-03-02", "2026-03-06", "Parental leave")],
    );
    let ctx = AnalyticsContext::new(make_date("2026-10-19"));

    let member = calculate_member_analytics(&snapshot, "m_001", &ctx).unwrap();
    assert_eq!(member.remaining_balance, decimal("20"));
    let parental = member.parental.unwrap();
    assert_eq!(parental.days_used_this_year, decimal("5"));
    assert_eq!(parental.remaining_balance, decimal("5"));
}

#[test]
fn test_report_serializes_decimals_as_strings() {
    let snapshot = create_snapshot(
        json!({ "team_id": "team_a", "max_leave_per_year": "20" }),
        vec![create_member("m_001", "day", weekdays())],
        vec![],
    );
    let ctx = AnalyticsContext::new(make_date("2026-10-19"));

    let report = calculate_team_analytics(&snapshot, &ctx).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["team_id"], "team_a");
    assert_eq!(value["as_of"], "2026-10-19");
    assert_eq!(value["analytics"]["aggregate"]["member_count"], 1);
    let remaining = value["analytics"]["groups"][0]["members"][0]["remaining_balance"]
        .as_str()
        .unwrap();
    assert_eq!(decimal(remaining), decimal("20"));
}

// =============================================================================
// SECTION 5: Configuration
// =============================================================================

#[test]
fn test_sample_config_drives_a_run() {
    let loader = ConfigLoader::load("./config/sample_team").expect("Failed to load config");
    let snapshot = TeamSnapshot {
        policy: loader.policy().clone(),
        members: vec![serde_json::from_value(create_member("m_001", "day", weekdays())).unwrap()],
        requests: vec![],
    };
    let ctx = AnalyticsContext::new(make_date("2026-12-11")).with_settings(loader.settings().clone());

    let member = calculate_member_analytics(&snapshot, "m_001", &ctx).unwrap();
    assert_eq!(member.realistic_usable_days, decimal("15"));
    // 20 remaining, capped at 10
    assert_eq!(member.will_carryover, decimal("10"));
    assert_eq!(member.realistic_carryover_usable_days, decimal("10"));
    assert_eq!(member.will_lose, decimal("10"));
}
