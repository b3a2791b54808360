//! Areas of responsibility (PARA "A")

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// An ongoing sphere of responsibility grouping projects and actions.
///
/// `health` is a loose vocabulary (`healthy`, `at_risk`, `neglected`)
/// stored free-form; areas have no enforced referential integrity beyond
/// the soft `area_id` links pointing at them.
#[derive(Debug, Clone, Serialize)]
pub struct Area {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub standard: Option<String>,
    pub responsibilities: Vec<String>,
    pub health: String,
    pub last_review: Option<NaiveDate>,
    pub review_notes: Option<String>,
    pub review_frequency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
