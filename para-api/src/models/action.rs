//! Action entity and status vocabulary

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Action workflow status.
///
/// Every status may transition to every other; `done` and `cancelled` are
/// terminal by convention only. Re-opening a done action is allowed so
/// mistakes can be corrected, and clears `completed_at` (see
/// [`super::lifecycle`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Captured but not yet triaged
    Inbox,
    /// Next physical action, ready to work
    Next,
    /// Blocked on someone else
    Waiting,
    /// Tied to a calendar date
    Scheduled,
    /// Someday/maybe
    Someday,
    /// Finished
    Done,
    /// Abandoned
    Cancelled,
}

impl ActionStatus {
    pub const ALL: [ActionStatus; 7] = [
        ActionStatus::Inbox,
        ActionStatus::Next,
        ActionStatus::Waiting,
        ActionStatus::Scheduled,
        ActionStatus::Someday,
        ActionStatus::Done,
        ActionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Inbox => "inbox",
            ActionStatus::Next => "next",
            ActionStatus::Waiting => "waiting",
            ActionStatus::Scheduled => "scheduled",
            ActionStatus::Someday => "someday",
            ActionStatus::Done => "done",
            ActionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Statuses a deferral may target (everything non-terminal).
    pub fn is_deferral_target(&self) -> bool {
        !matches!(self, ActionStatus::Done | ActionStatus::Cancelled)
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single next action (or captured task).
#[derive(Debug, Clone, Serialize)]
pub struct Action {
    pub id: i64,
    pub title: String,
    pub status: ActionStatus,
    pub context: Vec<String>,
    pub energy: Option<String>,
    pub time_estimate: Option<String>,
    pub project_id: Option<i64>,
    pub area_id: Option<i64>,
    pub waiting_on: Option<String>,
    pub delegated_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub scheduled_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub source: Option<String>,
    pub ai_notes: Option<String>,

    /// Joined project name, present on list/get reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}
