//! Inbox capture records

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A raw capture awaiting triage.
///
/// Mutated exactly once, by triage, which stamps `processed_at` and
/// `processed_to`. Processed items never re-enter the unprocessed list.
#[derive(Debug, Clone, Serialize)]
pub struct InboxItem {
    pub id: i64,
    pub raw_input: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_to: Option<String>,
    pub ai_notes: Option<String>,
}

impl InboxItem {
    pub fn is_processed(&self) -> bool {
        self.processed_at.is_some()
    }
}
