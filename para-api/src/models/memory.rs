//! Assistant memory notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of knowledge a memory captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Preference,
    Decision,
    Context,
    Fact,
    Pattern,
    Feedback,
    Workflow,
    Style,
}

impl MemoryType {
    pub const ALL: [MemoryType; 8] = [
        MemoryType::Preference,
        MemoryType::Decision,
        MemoryType::Context,
        MemoryType::Fact,
        MemoryType::Pattern,
        MemoryType::Feedback,
        MemoryType::Workflow,
        MemoryType::Style,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Preference => "preference",
            MemoryType::Decision => "decision",
            MemoryType::Context => "context",
            MemoryType::Fact => "fact",
            MemoryType::Pattern => "pattern",
            MemoryType::Feedback => "feedback",
            MemoryType::Workflow => "workflow",
            MemoryType::Style => "style",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory lifecycle. Archiving is one-way (soft delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryStatus {
    Active,
    Archived,
}

impl MemoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryStatus::Active => "active",
            MemoryStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(MemoryStatus::Active),
            "archived" => Some(MemoryStatus::Archived),
            _ => None,
        }
    }
}

/// A stored note about preferences, decisions, or context.
///
/// `times_referenced` increments on every individual fetch (never on list
/// or search queries); `last_referenced` moves in lockstep.
#[derive(Debug, Clone, Serialize)]
pub struct Memory {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    pub domain: Option<String>,
    pub content: String,
    pub confidence: String,
    pub times_referenced: i64,
    pub last_referenced: Option<DateTime<Utc>>,
    pub status: MemoryStatus,
    pub expires_at: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Classify quick-captured text by leading phrase.
///
/// "i prefer ..." / "<name> prefers ..." openings become preferences,
/// "decided ..." / "we decided ..." become decisions, text mentioning a
/// workflow or process becomes a workflow note, everything else a fact.
/// Returns the type and the derived title (first 100 chars, prefix
/// stripped for preferences and decisions).
pub fn classify_capture(text: &str) -> (MemoryType, String) {
    let lower = text.to_lowercase();
    let truncate = |s: &str| s.chars().take(100).collect::<String>();

    if let Some(rest) = strip_prefix_ci(text, "i prefer") {
        return (MemoryType::Preference, truncate(rest));
    }
    // "<name> prefers ...": second word marks a preference statement
    let mut parts = text.splitn(3, char::is_whitespace);
    if let (Some(_), Some(second)) = (parts.next(), parts.next()) {
        if second.eq_ignore_ascii_case("prefers") {
            let rest = parts.next().unwrap_or("").trim_start();
            return (MemoryType::Preference, truncate(rest));
        }
    }
    for prefix in ["we decided", "decided"] {
        if let Some(rest) = strip_prefix_ci(text, prefix) {
            return (MemoryType::Decision, truncate(rest));
        }
    }
    if lower.contains("workflow") || lower.contains("process") {
        return (MemoryType::Workflow, truncate(text));
    }
    (MemoryType::Fact, truncate(text))
}

/// ASCII case-insensitive prefix strip, returning the trimmed remainder.
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if text.len() >= prefix.len() && text.is_char_boundary(prefix.len()) {
        let (head, rest) = text.split_at(prefix.len());
        if head.eq_ignore_ascii_case(prefix) {
            return Some(rest.trim_start());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_roundtrip() {
        for t in MemoryType::ALL {
            assert_eq!(MemoryType::parse(t.as_str()), Some(t));
        }
        assert_eq!(MemoryType::parse("opinion"), None);
    }

    #[test]
    fn test_classify_preference() {
        let (t, title) = classify_capture("I prefer short standup notes");
        assert_eq!(t, MemoryType::Preference);
        assert_eq!(title, "short standup notes");
    }

    #[test]
    fn test_classify_decision() {
        let (t, title) = classify_capture("Decided to ship weekly on Fridays");
        assert_eq!(t, MemoryType::Decision);
        assert_eq!(title, "to ship weekly on Fridays");
    }

    #[test]
    fn test_classify_workflow() {
        let (t, _) = classify_capture("The release process starts with a tag");
        assert_eq!(t, MemoryType::Workflow);
    }

    #[test]
    fn test_classify_default_fact() {
        let (t, title) = classify_capture("The server lives in the garage");
        assert_eq!(t, MemoryType::Fact);
        assert_eq!(title, "The server lives in the garage");
    }
}
