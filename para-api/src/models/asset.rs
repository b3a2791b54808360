//! Domain assets moving through the curriculum pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered production pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idea,
    Queued,
    InProgress,
    Review,
    Published,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Idea,
        PipelineStage::Queued,
        PipelineStage::InProgress,
        PipelineStage::Review,
        PipelineStage::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idea => "idea",
            PipelineStage::Queued => "queued",
            PipelineStage::InProgress => "in_progress",
            PipelineStage::Review => "review",
            PipelineStage::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == s)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A produced artifact (question bank, training module, lesson plan, ...)
/// tracked from idea to publication.
///
/// `published_at` is stamped on the first transition into `published` and
/// is sticky: later stage changes never clear or re-stamp it.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub module: String,
    pub level: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub category: Option<String>,
    pub pipeline_stage: PipelineStage,
    pub description: Option<String>,
    pub link: Option<String>,
    pub file_path: Option<String>,
    pub version: Option<String>,
    pub quality_score: Option<i64>,
    pub skills_used: Vec<String>,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}
