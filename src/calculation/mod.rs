//! Calculation logic for the Leave Analytics Engine.
//!
//! This module contains every stage of an analytics run, leaf first: shift
//! calendar evaluation and working-day counting, leave classification,
//! balance calculation for the ordinary and parental pools, fair-share
//! capacity allocation within shift-sharing groups, carryover projection,
//! aggregation into group and team views, and the runner that wires them
//! together over a team snapshot.

mod aggregation;
mod balance;
mod capacity;
mod fair_share;
mod leave_classifier;
mod projection;
mod shift_calendar;
mod team_analytics;
mod working_days;

pub use aggregation::{
    DEFAULT_AT_RISK_FRACTION, aggregate_members, group_team_analytics, is_at_risk,
};
pub use balance::{
    BalanceResult, BalanceSource, ParentalBalanceResult, calculate_ordinary_balance,
    calculate_parental_balance,
};
pub use capacity::{CapacityParticipant, GroupCapacity, MemberCapacity, allocate_group_capacity};
pub use fair_share::{
    ALLOCATION_UNIT, FairShareAllocation, FairShareClaim, floor_to_unit, water_fill,
};
pub use leave_classifier::{categorize, categorize_for, classify};
pub use projection::{ProjectionResult, calculate_projection, carryover_capacity};
pub use shift_calendar::{ShiftCalendar, is_working_day, working_days_fingerprint};
pub use team_analytics::{AnalyticsContext, calculate_member_analytics, calculate_team_analytics};
pub use working_days::{count_calendar_days, count_working_days, days_inclusive};
