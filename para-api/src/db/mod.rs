//! Database access for para-api
//!
//! One module per table, each exposing async functions over the shared
//! `SqlitePool`. All writes go through single parameterized statements;
//! ids come back from the driver's `last_insert_rowid()`. Concurrent
//! writers to the same row race under last-write-wins, which is
//! acceptable for the single-user scope and a known limitation.

pub mod actions;
pub mod areas;
pub mod assets;
pub mod dashboard;
pub mod inbox;
pub mod memory;
pub mod projects;
pub mod research;
pub mod resources;
pub mod reviews;

use chrono::{DateTime, NaiveDate, Utc};
use para_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Decode a stored JSON tag list. A null column is an empty list; a
/// non-JSON value (hand-edited store) is kept as a single tag rather
/// than dropped.
pub(crate) fn tags_from_column(raw: Option<String>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|_| vec![raw]),
    }
}

/// Encode a tag list for storage as a JSON array column.
pub(crate) fn tags_to_column(tags: &[String]) -> Result<String> {
    serde_json::to_string(tags)
        .map_err(|e| Error::Internal(format!("Failed to serialize tags: {}", e)))
}

pub(crate) fn read_datetime(row: &SqliteRow, col: &str) -> Result<DateTime<Utc>> {
    let raw: String = row
        .try_get(col)
        .map_err(|e| Error::Internal(format!("Missing column {}: {}", col, e)))?;
    time::parse_datetime(&raw)
}

pub(crate) fn read_opt_datetime(row: &SqliteRow, col: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row
        .try_get(col)
        .map_err(|e| Error::Internal(format!("Missing column {}: {}", col, e)))?;
    raw.as_deref().map(time::parse_datetime).transpose()
}

pub(crate) fn read_date(row: &SqliteRow, col: &str) -> Result<NaiveDate> {
    let raw: String = row
        .try_get(col)
        .map_err(|e| Error::Internal(format!("Missing column {}: {}", col, e)))?;
    time::parse_date(&raw)
}

pub(crate) fn read_opt_date(row: &SqliteRow, col: &str) -> Result<Option<NaiveDate>> {
    let raw: Option<String> = row
        .try_get(col)
        .map_err(|e| Error::Internal(format!("Missing column {}: {}", col, e)))?;
    raw.as_deref().map(time::parse_date).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_roundtrip() {
        let tags = vec!["@computer".to_string(), "@deepwork".to_string()];
        let column = tags_to_column(&tags).unwrap();
        assert_eq!(tags_from_column(Some(column)), tags);
    }

    #[test]
    fn test_tags_null_column_is_empty() {
        assert!(tags_from_column(None).is_empty());
    }

    #[test]
    fn test_tags_non_json_kept_as_single_tag() {
        assert_eq!(
            tags_from_column(Some("@errands".to_string())),
            vec!["@errands".to_string()]
        );
    }
}
