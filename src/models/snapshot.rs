//! Team snapshot model.
//!
//! A [`TeamSnapshot`] is the complete, consistent set of records one analytics
//! run reads: the team's policy, every member, and every leave request.

use serde::{Deserialize, Serialize};

use super::{LeaveRequest, Member, TeamPolicy};

/// All records for one team at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    /// The team's leave policy.
    pub policy: TeamPolicy,
    /// Every member of the team.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Every leave request for the team, in any status.
    #[serde(default)]
    pub requests: Vec<LeaveRequest>,
}

impl TeamSnapshot {
    /// Looks up a member by ID.
    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    /// Returns every request submitted by `member_id`.
    pub fn requests_for<'a>(
        &'a self,
        member_id: &'a str,
    ) -> impl Iterator<Item = &'a LeaveRequest> + 'a {
        self.requests.iter().filter(move |r| r.member_id == member_id)
    }
}
