//! Research journal entries

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One research session: objective, sources touched, what was learned.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchLog {
    pub id: i64,
    pub date: NaiveDate,
    pub family_lines: Vec<String>,
    pub objective: String,
    pub sources_consulted: Vec<String>,
    pub findings: Option<String>,
    pub new_questions: Option<String>,
    pub next_steps: Option<String>,
    pub time_spent: Option<i64>,
    pub confidence: Option<String>,
    pub created_at: DateTime<Utc>,
}
