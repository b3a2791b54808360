//! Inbox table operations and triage

use para_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::{Action, ActionStatus, InboxItem};

pub(crate) fn from_row(row: &SqliteRow) -> Result<InboxItem> {
    Ok(InboxItem {
        id: row.get("id"),
        raw_input: row.get("raw_input"),
        source: row.get("source"),
        created_at: super::read_datetime(row, "created_at")?,
        processed_at: super::read_opt_datetime(row, "processed_at")?,
        processed_to: row.get("processed_to"),
        ai_notes: row.get("ai_notes"),
    })
}

/// Unprocessed captures, newest first.
pub async fn list_unprocessed(pool: &SqlitePool, limit: Option<i64>) -> Result<Vec<InboxItem>> {
    let rows = match limit {
        Some(limit) => {
            sqlx::query(
                "SELECT * FROM inbox WHERE processed_at IS NULL \
                 ORDER BY created_at DESC LIMIT ?",
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query("SELECT * FROM inbox WHERE processed_at IS NULL ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?
        }
    };
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<InboxItem>> {
    let row = sqlx::query("SELECT * FROM inbox WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn insert(pool: &SqlitePool, raw_input: &str, source: &str) -> Result<InboxItem> {
    let result = sqlx::query("INSERT INTO inbox (raw_input, source, created_at) VALUES (?, ?, ?)")
        .bind(raw_input)
        .bind(source)
        .bind(time::format_datetime(&time::now()))
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inserted inbox item {} not found", id)))
}

/// Stamp an item processed. One-way: an already-processed item conflicts.
pub async fn mark_processed(
    pool: &SqlitePool,
    id: i64,
    processed_to: &str,
    ai_notes: Option<&str>,
) -> Result<Option<InboxItem>> {
    let Some(existing) = get(pool, id).await? else {
        return Ok(None);
    };
    if existing.is_processed() {
        return Err(Error::Conflict(format!(
            "Inbox item {} already processed to '{}'",
            id,
            existing.processed_to.as_deref().unwrap_or("?")
        )));
    }

    sqlx::query(
        "UPDATE inbox SET processed_at = ?, processed_to = ?, ai_notes = COALESCE(?, ai_notes) \
         WHERE id = ?",
    )
    .bind(time::format_datetime(&time::now()))
    .bind(processed_to)
    .bind(ai_notes)
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM inbox WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Triage decision for one inbox item.
#[derive(Debug)]
pub enum TriageDecision {
    /// Create an action from the capture. Every field may be overridden;
    /// defaults are the raw text as title, context `@anywhere`, status
    /// `next`.
    Action {
        title: Option<String>,
        status: ActionStatus,
        context: Option<Vec<String>>,
        project_id: Option<i64>,
    },
    /// Discard: no new record, item stamped `trash`.
    Trash,
}

/// What triage produced.
#[derive(Debug)]
pub enum TriageOutcome {
    Action(Action),
    Trashed,
}

/// Process one capture. Either path is one-way; re-triaging an already
/// processed item fails with a conflict and creates nothing.
pub async fn triage(
    pool: &SqlitePool,
    id: i64,
    decision: TriageDecision,
) -> Result<Option<TriageOutcome>> {
    let Some(item) = get(pool, id).await? else {
        return Ok(None);
    };
    if item.is_processed() {
        return Err(Error::Conflict(format!(
            "Inbox item {} already processed to '{}'",
            id,
            item.processed_to.as_deref().unwrap_or("?")
        )));
    }

    match decision {
        TriageDecision::Action {
            title,
            status,
            context,
            project_id,
        } => {
            let action = super::actions::insert(
                pool,
                &super::actions::NewAction {
                    title: title.unwrap_or_else(|| item.raw_input.clone()),
                    status,
                    context: Some(context.unwrap_or_else(|| vec!["@anywhere".to_string()])),
                    energy: Some("medium".to_string()),
                    time_estimate: None,
                    project_id,
                    area_id: None,
                    waiting_on: None,
                    delegated_to: None,
                    due_date: None,
                    scheduled_date: None,
                    source: Some("inbox_processed".to_string()),
                    ai_notes: Some(format!("Processed from inbox #{}", id)),
                },
            )
            .await?;

            sqlx::query("UPDATE inbox SET processed_at = ?, processed_to = 'action' WHERE id = ?")
                .bind(time::format_datetime(&time::now()))
                .bind(id)
                .execute(pool)
                .await?;

            Ok(Some(TriageOutcome::Action(action)))
        }
        TriageDecision::Trash => {
            sqlx::query("UPDATE inbox SET processed_at = ?, processed_to = 'trash' WHERE id = ?")
                .bind(time::format_datetime(&time::now()))
                .bind(id)
                .execute(pool)
                .await?;
            Ok(Some(TriageOutcome::Trashed))
        }
    }
}
