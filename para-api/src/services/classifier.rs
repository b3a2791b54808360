//! Classification oracle client
//!
//! Narrow boundary to an external text-classification capability (the
//! Anthropic Messages API). The oracle turns free text into structured
//! GTD decisions; this module owns the prompt contract and response
//! parsing, nothing else. Calls carry a bounded 30-second timeout, are
//! never retried automatically, and fail fast when no credential is
//! configured; there is no fallback classification.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::models::Action;

const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-sonnet-4-20250514";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Classifier client errors
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier API key not configured")]
    MissingCredential,

    #[error("Classifier request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Classifier API error {0}: {1}")]
    Api(u16, String),

    #[error("Classifier response parse error: {0}")]
    Parse(String),
}

/// One structured decision about a piece of captured text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedItem {
    /// What the user originally said (brain-dump items only)
    pub original: Option<String>,
    /// `action`, `project`, `calendar`, `reference`, `someday`, or `trash`
    #[serde(rename = "type")]
    pub kind: String,
    /// Normalized next-action title, verb first
    pub title: Option<String>,
    pub time_estimate: Option<String>,
    #[serde(default)]
    pub context: Vec<String>,
    pub energy: Option<String>,
    pub domain: Option<String>,
    pub project_name: Option<String>,
    pub calendar_datetime: Option<String>,
    pub notes: Option<String>,
}

/// Brain-dump output: a list of discrete items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainDumpResult {
    pub items: Vec<ClassifiedItem>,
}

/// Triage suggestion for one inbox item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageSuggestion {
    pub actionable: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub project_name: Option<String>,
    #[serde(default)]
    pub context: Vec<String>,
    pub time_estimate: Option<String>,
    pub energy: Option<String>,
    pub domain: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub action_id: Option<i64>,
    pub title: String,
    pub reason: String,
}

/// What-to-work-on-now output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// Current-state context handed to the recommender.
#[derive(Debug)]
pub struct WorkSnapshot {
    pub energy: String,
    pub available_minutes: i64,
    pub next_actions: Vec<Action>,
    /// Waiting actions with their fractional-day age
    pub stale_waiting: Vec<(Action, f64)>,
    pub projects_without_next: Vec<String>,
}

/// Anthropic Messages API response (the slice we consume)
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// Classification oracle client
pub struct ClassifierClient {
    http: reqwest::Client,
    api_key: String,
}

impl ClassifierClient {
    pub fn new(api_key: String) -> Result<Self, ClassifierError> {
        if api_key.trim().is_empty() {
            return Err(ClassifierError::MissingCredential);
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClassifierError::Network(e.to_string()))?;
        Ok(Self { http, api_key })
    }

    /// Split a free-text brain dump into discrete structured items.
    pub async fn brain_dump(&self, text: &str) -> Result<BrainDumpResult, ClassifierError> {
        let raw = self.complete(&brain_dump_prompt(text), 2000).await?;
        parse_payload(&raw)
    }

    /// Suggest a triage decision for one raw inbox capture.
    pub async fn triage(&self, raw_input: &str) -> Result<TriageSuggestion, ClassifierError> {
        let raw = self.complete(&triage_prompt(raw_input), 500).await?;
        parse_payload(&raw)
    }

    /// Recommend what to work on now, given the current state.
    pub async fn recommend(
        &self,
        snapshot: &WorkSnapshot,
    ) -> Result<Recommendations, ClassifierError> {
        let raw = self.complete(&recommend_prompt(snapshot), 1000).await?;
        parse_payload(&raw)
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ClassifierError> {
        let response = self
            .http
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": MODEL,
                "max_tokens": max_tokens,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout
                } else {
                    ClassifierError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api(status.as_u16(), body));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(format!("Malformed API response: {}", e)))?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| ClassifierError::Parse("No text content in response".to_string()))
    }
}

/// Parse the oracle's JSON payload into the expected shape. The oracle is
/// instructed to answer with bare JSON; anything else is a parse failure,
/// never silently coerced.
pub(crate) fn parse_payload<T: serde::de::DeserializeOwned>(
    raw: &str,
) -> Result<T, ClassifierError> {
    serde_json::from_str(raw.trim()).map_err(|e| ClassifierError::Parse(e.to_string()))
}

fn brain_dump_prompt(text: &str) -> String {
    format!(
        r#"You are a GTD (Getting Things Done) assistant. Process this brain dump into discrete items.

For each item, determine:
1. Is it actionable? (If no: reference, someday, or trash)
2. What's the next physical action? (Start with a verb)
3. Time estimate (2min, 5min, 15min, 30min, 1hr, 2hr+)
4. Context (@computer, @phone, @errands, @home, @anywhere, @deepwork, @quickwin)
5. Energy level (high, normal, low)
6. Is it a single action or a project (multi-step)?
7. Domain tag if one clearly applies

Brain dump:
{text}

Respond in JSON only (no markdown):
{{
  "items": [
    {{
      "original": "what they said",
      "type": "action|project|calendar|reference|someday|trash",
      "title": "Clean next action title starting with verb",
      "time_estimate": "15min",
      "context": ["@computer"],
      "energy": "normal",
      "domain": "personal",
      "project_name": "if this spawns a project",
      "calendar_datetime": "if calendar item, ISO datetime",
      "notes": "any additional context"
    }}
  ]
}}"#
    )
}

fn triage_prompt(raw_input: &str) -> String {
    format!(
        r#"Process this inbox item according to GTD methodology:

"{raw_input}"

Determine:
1. Is it actionable? If not, is it reference material, someday/maybe, or trash?
2. If actionable, is it a project (multiple steps) or single action?
3. What is the clear next action? (Start with verb)
4. Suggested context, time estimate, energy level
5. Domain tag if one clearly applies

Respond in JSON only:
{{
  "actionable": true,
  "type": "action|project|reference|someday|trash",
  "title": "Clear next action starting with verb",
  "project_name": "If it's a project",
  "context": ["@computer"],
  "time_estimate": "15min",
  "energy": "normal",
  "domain": "personal",
  "notes": "Any relevant notes"
}}"#
    )
}

fn recommend_prompt(snapshot: &WorkSnapshot) -> String {
    let next_actions = if snapshot.next_actions.is_empty() {
        "None".to_string()
    } else {
        snapshot
            .next_actions
            .iter()
            .map(|a| {
                format!(
                    "- {} [{}] ({})",
                    a.title,
                    if a.context.is_empty() {
                        "no context".to_string()
                    } else {
                        a.context.join(", ")
                    },
                    a.time_estimate.as_deref().unwrap_or("unknown")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let stale_waiting = if snapshot.stale_waiting.is_empty() {
        "None".to_string()
    } else {
        snapshot
            .stale_waiting
            .iter()
            .map(|(a, days)| {
                format!(
                    "- {} - waiting on {} for {} days",
                    a.title,
                    a.waiting_on.as_deref().unwrap_or("someone"),
                    days.floor() as i64
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let stuck_projects = if snapshot.projects_without_next.is_empty() {
        "None".to_string()
    } else {
        snapshot
            .projects_without_next
            .iter()
            .map(|name| format!("- {}", name))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are helping decide what to work on. Here's the current state:

Available time: {} minutes
Current energy: {}

Next Actions ({}):
{}

Stale Waiting For (needs follow-up):
{}

Projects without Next Action (PROBLEM):
{}

Based on GTD principles (context, time, energy, priority), recommend 3 actions.
For each, explain briefly why it's a good choice right now.

Respond in JSON only (no markdown):
{{
  "recommendations": [
    {{
      "action_id": 123,
      "title": "action title",
      "reason": "Why now - 1 sentence"
    }}
  ],
  "alerts": [
    "Any urgent issues (e.g., 'Project X has no next action')"
  ]
}}"#,
        snapshot.available_minutes,
        snapshot.energy,
        snapshot.next_actions.len(),
        next_actions,
        stale_waiting,
        stuck_projects,
    )
}
