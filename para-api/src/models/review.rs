//! Weekly review records

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One review per Monday-aligned week (`week_of` is unique).
///
/// `completed_at` is stamped exactly when a non-null `next_week_focus` is
/// written; deciding next week's focus is what finishes a review.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReview {
    pub id: i64,
    pub week_of: NaiveDate,
    pub actions_completed: Option<i64>,
    pub projects_completed: Option<i64>,
    pub inbox_processed: Option<i64>,
    pub metrics_by_domain: Option<serde_json::Value>,
    pub key_wins: Option<String>,
    pub blockers_hit: Option<String>,
    pub next_week_focus: Option<String>,
    pub ai_summary: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
