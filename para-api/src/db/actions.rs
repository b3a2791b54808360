//! Action table operations

use chrono::NaiveDate;
use para_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::models::lifecycle;
use crate::models::{Action, ActionStatus};

const SELECT_WITH_PROJECT: &str = "SELECT a.*, p.name AS project_name \
     FROM actions a LEFT JOIN projects p ON a.project_id = p.id";

pub(crate) fn from_row(row: &SqliteRow) -> Result<Action> {
    let status_raw: String = row.get("status");
    let status = ActionStatus::parse(&status_raw)
        .ok_or_else(|| Error::Internal(format!("Unknown action status '{}'", status_raw)))?;

    Ok(Action {
        id: row.get("id"),
        title: row.get("title"),
        status,
        context: super::tags_from_column(row.get("context")),
        energy: row.get("energy"),
        time_estimate: row.get("time_estimate"),
        project_id: row.get("project_id"),
        area_id: row.get("area_id"),
        waiting_on: row.get("waiting_on"),
        delegated_to: row.get("delegated_to"),
        due_date: super::read_opt_date(row, "due_date")?,
        scheduled_date: super::read_opt_date(row, "scheduled_date")?,
        completed_at: super::read_opt_datetime(row, "completed_at")?,
        created_at: super::read_datetime(row, "created_at")?,
        updated_at: super::read_datetime(row, "updated_at")?,
        source: row.get("source"),
        ai_notes: row.get("ai_notes"),
        // Only present on queries that join projects
        project_name: row.try_get("project_name").ok().flatten(),
    })
}

/// Composable list filters. All are conjunctive (AND).
#[derive(Debug, Default)]
pub struct ActionFilters {
    pub status: Option<ActionStatus>,
    /// Substring match against the serialized tag list; a tag that is a
    /// substring of another will over-match
    pub context: Option<String>,
    pub project_id: Option<i64>,
    pub area_id: Option<i64>,
    /// Due within two days, or already a next action
    pub urgent: bool,
}

pub async fn list(pool: &SqlitePool, filters: &ActionFilters) -> Result<Vec<Action>> {
    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_WITH_PROJECT);
    qb.push(" WHERE 1=1");

    if let Some(status) = filters.status {
        qb.push(" AND a.status = ").push_bind(status.as_str());
    }
    if let Some(context) = &filters.context {
        qb.push(" AND a.context LIKE ").push_bind(format!("%{}%", context));
    }
    if let Some(project_id) = filters.project_id {
        qb.push(" AND a.project_id = ").push_bind(project_id);
    }
    if let Some(area_id) = filters.area_id {
        qb.push(" AND a.area_id = ").push_bind(area_id);
    }
    if filters.urgent {
        qb.push(" AND (a.due_date <= date('now', '+2 days') OR a.status = 'next')");
    }

    qb.push(" ORDER BY a.due_date ASC NULLS LAST, a.created_at DESC");

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Action>> {
    let row = sqlx::query(&format!("{} WHERE a.id = ?", SELECT_WITH_PROJECT))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

/// Fields for a new action. Status defaults to `inbox` at the boundary.
#[derive(Debug)]
pub struct NewAction {
    pub title: String,
    pub status: ActionStatus,
    pub context: Option<Vec<String>>,
    pub energy: Option<String>,
    pub time_estimate: Option<String>,
    pub project_id: Option<i64>,
    pub area_id: Option<i64>,
    pub waiting_on: Option<String>,
    pub delegated_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub scheduled_date: Option<NaiveDate>,
    pub source: Option<String>,
    pub ai_notes: Option<String>,
}

pub async fn insert(pool: &SqlitePool, new: &NewAction) -> Result<Action> {
    let now = time::format_datetime(&time::now());
    let context = new
        .context
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;

    let result = sqlx::query(
        r#"
        INSERT INTO actions (
            title, status, context, energy, time_estimate,
            project_id, area_id, waiting_on, delegated_to,
            due_date, scheduled_date, source, ai_notes,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.title)
    .bind(new.status.as_str())
    .bind(&context)
    .bind(&new.energy)
    .bind(&new.time_estimate)
    .bind(new.project_id)
    .bind(new.area_id)
    .bind(&new.waiting_on)
    .bind(&new.delegated_to)
    .bind(new.due_date.map(|d| d.to_string()))
    .bind(new.scheduled_date.map(|d| d.to_string()))
    .bind(&new.source)
    .bind(&new.ai_notes)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inserted action {} not found", id)))
}

/// Partial update. Core fields coalesce to their existing value when
/// absent; association fields (project, area, waiting_on, delegated_to,
/// due/scheduled dates) are overwritten verbatim; absent means cleared.
#[derive(Debug, Default)]
pub struct ActionUpdate {
    pub title: Option<String>,
    pub status: Option<ActionStatus>,
    pub context: Option<Vec<String>>,
    pub energy: Option<String>,
    pub time_estimate: Option<String>,
    pub project_id: Option<i64>,
    pub area_id: Option<i64>,
    pub waiting_on: Option<String>,
    pub delegated_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub scheduled_date: Option<NaiveDate>,
    pub ai_notes: Option<String>,
}

pub async fn update(pool: &SqlitePool, id: i64, upd: &ActionUpdate) -> Result<Option<Action>> {
    let Some(existing) = get(pool, id).await? else {
        return Ok(None);
    };

    let now = time::now();
    let effective_status = upd.status.unwrap_or(existing.status);
    let completed_at = lifecycle::action_completed_at(
        effective_status,
        existing.status,
        existing.completed_at,
        now,
    );
    let context = upd
        .context
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;

    sqlx::query(
        r#"
        UPDATE actions SET
            title = COALESCE(?, title),
            status = ?,
            context = COALESCE(?, context),
            energy = COALESCE(?, energy),
            time_estimate = COALESCE(?, time_estimate),
            project_id = ?,
            area_id = ?,
            waiting_on = ?,
            delegated_to = ?,
            due_date = ?,
            scheduled_date = ?,
            ai_notes = COALESCE(?, ai_notes),
            completed_at = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&upd.title)
    .bind(effective_status.as_str())
    .bind(&context)
    .bind(&upd.energy)
    .bind(&upd.time_estimate)
    .bind(upd.project_id)
    .bind(upd.area_id)
    .bind(&upd.waiting_on)
    .bind(&upd.delegated_to)
    .bind(upd.due_date.map(|d| d.to_string()))
    .bind(upd.scheduled_date.map(|d| d.to_string()))
    .bind(&upd.ai_notes)
    .bind(completed_at.map(|dt| time::format_datetime(&dt)))
    .bind(time::format_datetime(&now))
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Mark done. Idempotent: completing an already-done action returns it
/// unchanged without touching `completed_at`.
pub async fn complete(pool: &SqlitePool, id: i64) -> Result<Option<Action>> {
    let Some(existing) = get(pool, id).await? else {
        return Ok(None);
    };
    if existing.status == ActionStatus::Done {
        return Ok(Some(existing));
    }

    let now = time::now();
    sqlx::query(
        "UPDATE actions SET status = 'done', completed_at = ?, updated_at = ? WHERE id = ?",
    )
    .bind(time::format_datetime(&now))
    .bind(time::format_datetime(&now))
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Move to a non-terminal status (default `someday`), optionally setting
/// a scheduled date. Any source status is allowed, including `done`:
/// deferring out of done re-opens the action.
pub async fn defer(
    pool: &SqlitePool,
    id: i64,
    to_status: ActionStatus,
    scheduled_date: Option<NaiveDate>,
) -> Result<Option<Action>> {
    set_status_with_schedule(pool, id, to_status, Some(scheduled_date)).await
}

/// Change status only, leaving the schedule untouched.
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    to_status: ActionStatus,
) -> Result<Option<Action>> {
    set_status_with_schedule(pool, id, to_status, None).await
}

async fn set_status_with_schedule(
    pool: &SqlitePool,
    id: i64,
    to_status: ActionStatus,
    scheduled_date: Option<Option<NaiveDate>>,
) -> Result<Option<Action>> {
    let Some(existing) = get(pool, id).await? else {
        return Ok(None);
    };

    let now = time::now();
    let completed_at = lifecycle::action_completed_at(
        to_status,
        existing.status,
        existing.completed_at,
        now,
    );
    let scheduled = scheduled_date.unwrap_or(existing.scheduled_date);

    sqlx::query(
        "UPDATE actions SET status = ?, scheduled_date = ?, completed_at = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(to_status.as_str())
    .bind(scheduled.map(|d| d.to_string()))
    .bind(completed_at.map(|dt| time::format_datetime(&dt)))
    .bind(time::format_datetime(&now))
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM actions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
