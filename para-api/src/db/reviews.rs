//! Weekly review table operations
//!
//! One row per Monday-aligned week. `completed_at` is stamped exactly
//! when a non-null `next_week_focus` is written.

use chrono::NaiveDate;
use para_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::WeeklyReview;

pub(crate) fn from_row(row: &SqliteRow) -> Result<WeeklyReview> {
    let metrics_raw: Option<String> = row.get("metrics_by_domain");
    let metrics_by_domain = metrics_raw
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to parse metrics_by_domain: {}", e)))?;

    Ok(WeeklyReview {
        id: row.get("id"),
        week_of: super::read_date(row, "week_of")?,
        actions_completed: row.get("actions_completed"),
        projects_completed: row.get("projects_completed"),
        inbox_processed: row.get("inbox_processed"),
        metrics_by_domain,
        key_wins: row.get("key_wins"),
        blockers_hit: row.get("blockers_hit"),
        next_week_focus: row.get("next_week_focus"),
        ai_summary: row.get("ai_summary"),
        completed_at: super::read_opt_datetime(row, "completed_at")?,
        created_at: super::read_datetime(row, "created_at")?,
    })
}

pub async fn list(pool: &SqlitePool, limit: i64) -> Result<Vec<WeeklyReview>> {
    let rows = sqlx::query("SELECT * FROM weekly_reviews ORDER BY week_of DESC LIMIT ?")
        .bind(limit)
        .fetch_all(pool)
        .await?;
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<WeeklyReview>> {
    let row = sqlx::query("SELECT * FROM weekly_reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn get_by_week(pool: &SqlitePool, week_of: NaiveDate) -> Result<Option<WeeklyReview>> {
    let row = sqlx::query("SELECT * FROM weekly_reviews WHERE week_of = ?")
        .bind(week_of.to_string())
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

/// Fetch the review for the week containing `today`, creating an empty
/// placeholder row if the week has none yet.
pub async fn get_or_create_current(
    pool: &SqlitePool,
    today: NaiveDate,
) -> Result<WeeklyReview> {
    let week_of = time::week_monday(today);

    if let Some(review) = get_by_week(pool, week_of).await? {
        return Ok(review);
    }

    let result = sqlx::query("INSERT INTO weekly_reviews (week_of, created_at) VALUES (?, ?)")
        .bind(week_of.to_string())
        .bind(time::format_datetime(&time::now()))
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inserted weekly review {} not found", id)))
}

/// Upsert payload keyed by `week_of`. Count fields coalesce to existing
/// values; narrative fields overwrite.
#[derive(Debug)]
pub struct ReviewUpsert {
    pub week_of: NaiveDate,
    pub actions_completed: Option<i64>,
    pub projects_completed: Option<i64>,
    pub inbox_processed: Option<i64>,
    pub metrics_by_domain: Option<serde_json::Value>,
    pub key_wins: Option<String>,
    pub blockers_hit: Option<String>,
    pub next_week_focus: Option<String>,
    pub ai_summary: Option<String>,
}

/// Result distinguishes create from update so the boundary can answer 201
/// vs 200.
pub enum UpsertOutcome {
    Created(WeeklyReview),
    Updated(WeeklyReview),
}

pub async fn upsert(pool: &SqlitePool, input: &ReviewUpsert) -> Result<UpsertOutcome> {
    let metrics = input
        .metrics_by_domain
        .as_ref()
        .map(|v| {
            serde_json::to_string(v)
                .map_err(|e| Error::Internal(format!("Failed to serialize metrics: {}", e)))
        })
        .transpose()?;
    let now = time::format_datetime(&time::now());

    let existing = get_by_week(pool, input.week_of).await?;

    match existing {
        Some(_) => {
            sqlx::query(
                r#"
                UPDATE weekly_reviews SET
                    actions_completed = COALESCE(?, actions_completed),
                    projects_completed = COALESCE(?, projects_completed),
                    inbox_processed = COALESCE(?, inbox_processed),
                    metrics_by_domain = COALESCE(?, metrics_by_domain),
                    key_wins = ?,
                    blockers_hit = ?,
                    next_week_focus = ?,
                    ai_summary = ?,
                    completed_at = CASE WHEN ? IS NOT NULL THEN ? ELSE completed_at END
                WHERE week_of = ?
                "#,
            )
            .bind(input.actions_completed)
            .bind(input.projects_completed)
            .bind(input.inbox_processed)
            .bind(&metrics)
            .bind(&input.key_wins)
            .bind(&input.blockers_hit)
            .bind(&input.next_week_focus)
            .bind(&input.ai_summary)
            .bind(&input.next_week_focus)
            .bind(&now)
            .bind(input.week_of.to_string())
            .execute(pool)
            .await?;

            let review = get_by_week(pool, input.week_of).await?.ok_or_else(|| {
                Error::Internal(format!("Updated review for {} not found", input.week_of))
            })?;
            Ok(UpsertOutcome::Updated(review))
        }
        None => {
            let completed_at = input.next_week_focus.as_ref().map(|_| now.clone());

            let result = sqlx::query(
                r#"
                INSERT INTO weekly_reviews (
                    week_of, actions_completed, projects_completed, inbox_processed,
                    metrics_by_domain, key_wins, blockers_hit, next_week_focus,
                    ai_summary, completed_at, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(input.week_of.to_string())
            .bind(input.actions_completed)
            .bind(input.projects_completed)
            .bind(input.inbox_processed)
            .bind(&metrics)
            .bind(&input.key_wins)
            .bind(&input.blockers_hit)
            .bind(&input.next_week_focus)
            .bind(&input.ai_summary)
            .bind(&completed_at)
            .bind(&now)
            .execute(pool)
            .await?;

            let id = result.last_insert_rowid();
            let review = get(pool, id).await?.ok_or_else(|| {
                Error::Internal(format!("Inserted weekly review {} not found", id))
            })?;
            Ok(UpsertOutcome::Created(review))
        }
    }
}
