//! Research log table operations

use chrono::NaiveDate;
use para_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::ResearchLog;

pub(crate) fn from_row(row: &SqliteRow) -> Result<ResearchLog> {
    Ok(ResearchLog {
        id: row.get("id"),
        date: super::read_date(row, "date")?,
        family_lines: super::tags_from_column(row.get("family_lines")),
        objective: row.get("objective"),
        sources_consulted: super::tags_from_column(row.get("sources_consulted")),
        findings: row.get("findings"),
        new_questions: row.get("new_questions"),
        next_steps: row.get("next_steps"),
        time_spent: row.get("time_spent"),
        confidence: row.get("confidence"),
        created_at: super::read_datetime(row, "created_at")?,
    })
}

/// Recent sessions, newest research date first.
pub async fn list(pool: &SqlitePool, limit: i64) -> Result<Vec<ResearchLog>> {
    let rows = sqlx::query("SELECT * FROM research_logs ORDER BY date DESC LIMIT ?")
        .bind(limit)
        .fetch_all(pool)
        .await?;
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<ResearchLog>> {
    let row = sqlx::query("SELECT * FROM research_logs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

#[derive(Debug)]
pub struct NewResearchLog {
    pub date: NaiveDate,
    pub family_lines: Option<Vec<String>>,
    pub objective: String,
    pub sources_consulted: Option<Vec<String>>,
    pub findings: Option<String>,
    pub new_questions: Option<String>,
    pub next_steps: Option<String>,
    pub time_spent: Option<i64>,
    pub confidence: Option<String>,
}

pub async fn insert(pool: &SqlitePool, new: &NewResearchLog) -> Result<ResearchLog> {
    let family_lines = new
        .family_lines
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;
    let sources = new
        .sources_consulted
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;

    let result = sqlx::query(
        r#"
        INSERT INTO research_logs (
            date, family_lines, objective, sources_consulted,
            findings, new_questions, next_steps, time_spent, confidence,
            created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.date.to_string())
    .bind(&family_lines)
    .bind(&new.objective)
    .bind(&sources)
    .bind(&new.findings)
    .bind(&new.new_questions)
    .bind(&new.next_steps)
    .bind(new.time_spent)
    .bind(&new.confidence)
    .bind(time::format_datetime(&time::now()))
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inserted research log {} not found", id)))
}
