//! Leave request model and related types.
//!
//! Leave requests are created by member actions outside the engine and are
//! read-only here. Only approved requests affect balances and capacity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ParentalLeaveType;

/// Workflow status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved by the team leader.
    Approved,
    /// Declined.
    Rejected,
}

/// The category of a leave request.
///
/// Parental categories draw from a separate pool; every other category draws
/// from the ordinary pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveCategory {
    /// Annual / vacation leave.
    Ordinary,
    /// Maternity leave (parental pool).
    Maternity,
    /// Paternity leave (parental pool).
    Paternity,
    /// Sick leave.
    Sick,
    /// Bereavement / compassionate leave.
    Bereavement,
    /// Medical appointments and procedures.
    Medical,
    /// Family or household emergencies.
    Emergency,
    /// Anything that does not match a known category.
    Other,
}

impl LeaveCategory {
    /// Returns true for categories tracked in the parental-leave pool.
    pub fn is_parental(&self) -> bool {
        self.parental_type().is_some()
    }

    /// Returns the parental leave type this category belongs to, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{LeaveCategory, ParentalLeaveType};
    ///
    /// assert_eq!(
    ///     LeaveCategory::Maternity.parental_type(),
    ///     Some(ParentalLeaveType::Maternity)
    /// );
    /// assert_eq!(LeaveCategory::Bereavement.parental_type(), None);
    /// ```
    pub fn parental_type(&self) -> Option<ParentalLeaveType> {
        match self {
            LeaveCategory::Maternity => Some(ParentalLeaveType::Maternity),
            LeaveCategory::Paternity => Some(ParentalLeaveType::Paternity),
            _ => None,
        }
    }
}

impl std::fmt::Display for LeaveCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LeaveCategory::Ordinary => "Ordinary",
            LeaveCategory::Maternity => "Maternity",
            LeaveCategory::Paternity => "Paternity",
            LeaveCategory::Sick => "Sick",
            LeaveCategory::Bereavement => "Bereavement",
            LeaveCategory::Medical => "Medical",
            LeaveCategory::Emergency => "Emergency",
            LeaveCategory::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

/// A leave request submitted by a team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The member who requested the leave.
    pub member_id: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Free-text reason entered by the member.
    #[serde(default)]
    pub reason_text: String,
    /// Explicit category tag; untagged historical requests fall back to the
    /// keyword classifier.
    #[serde(default)]
    pub category: Option<LeaveCategory>,
    /// Workflow status.
    pub status: LeaveStatus,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Returns true if the request has been approved.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    /// Returns true if the request covers `date`.
    ///
    /// Requests whose end precedes their start cover no dates.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
