//! Reference resources (PARA "R")

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Reference material: documents, links, templates, checklists.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub area_id: Option<i64>,
    pub version: Option<String>,
    pub last_updated: Option<NaiveDate>,
    pub update_frequency: Option<String>,
    pub created_at: DateTime<Utc>,
}
