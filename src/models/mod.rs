//! Core data models for the Leave Analytics Engine.
//!
//! This module contains the snapshot records the engine reads and the
//! analytics structures it produces.

mod analytics;
mod leave_request;
mod member;
mod policy;
mod schedule;
mod snapshot;

pub use analytics::{
    AnalyticsAggregate, AuditStep, GroupAnalytics, GroupKey, GroupedTeamAnalytics,
    MemberAnalytics, MemberFailure, ParentalBalance, TeamAnalyticsReport,
};
pub use leave_request::{LeaveCategory, LeaveRequest, LeaveStatus};
pub use member::{ManualOverride, Member, ParentalLeaveType, ShiftTag};
pub use policy::{CountingMethod, ParentalLeavePolicies, ParentalLeavePolicy, PolicyYear, TeamPolicy};
pub use schedule::{ScheduleKind, ShiftSchedule};
pub use snapshot::TeamSnapshot;
