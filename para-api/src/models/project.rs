//! Project entity and status vocabulary

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Someday,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Active,
        ProjectStatus::OnHold,
        ProjectStatus::Someday,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Someday => "someday",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A multi-step outcome with its own desired result.
///
/// Progress is derived from owned actions, never stored:
/// `round(100 * done / (done + open))`, 0 when the project has no actions.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub status: ProjectStatus,
    pub outcome: Option<String>,
    pub success_criteria: Vec<String>,
    pub area_id: Option<i64>,
    pub domain: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub blocked: bool,
    pub blocker_note: Option<String>,
    pub priority: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Open (non-done) action count, present on list/get reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_count: Option<i64>,
    /// Done action count, present on list/get reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_count: Option<i64>,
    /// Derived completion percentage, present on list/get reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
}

/// Derived progress percentage from open/done counts.
pub fn progress_percent(open: i64, done: i64) -> i64 {
    let total = open + done;
    if total > 0 {
        ((done as f64 / total as f64) * 100.0).round() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ProjectStatus::parse("paused"), None);
    }

    #[test]
    fn test_progress_empty_project_is_zero() {
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn test_progress_rounds() {
        assert_eq!(progress_percent(2, 1), 33);
        assert_eq!(progress_percent(1, 2), 67);
        assert_eq!(progress_percent(0, 5), 100);
        assert_eq!(progress_percent(5, 0), 0);
    }
}
