//! Project table operations
//!
//! Every read annotates rows with open/done action counts and the derived
//! progress percentage. Progress is never stored.

use chrono::NaiveDate;
use para_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::models::lifecycle;
use crate::models::project::progress_percent;
use crate::models::{Action, Project, ProjectStatus};

const SELECT_WITH_COUNTS: &str = "SELECT p.*, \
     (SELECT COUNT(*) FROM actions WHERE project_id = p.id AND status != 'done') AS action_count, \
     (SELECT COUNT(*) FROM actions WHERE project_id = p.id AND status = 'done') AS completed_count \
     FROM projects p";

pub(crate) fn from_row(row: &SqliteRow) -> Result<Project> {
    let status_raw: String = row.get("status");
    let status = ProjectStatus::parse(&status_raw)
        .ok_or_else(|| Error::Internal(format!("Unknown project status '{}'", status_raw)))?;

    let action_count: Option<i64> = row.try_get("action_count").ok();
    let completed_count: Option<i64> = row.try_get("completed_count").ok();
    let progress = match (action_count, completed_count) {
        (Some(open), Some(done)) => Some(progress_percent(open, done)),
        _ => None,
    };

    Ok(Project {
        id: row.get("id"),
        name: row.get("name"),
        status,
        outcome: row.get("outcome"),
        success_criteria: super::tags_from_column(row.get("success_criteria")),
        area_id: row.get("area_id"),
        domain: row.get("domain"),
        target_date: super::read_opt_date(row, "target_date")?,
        completed_at: super::read_opt_datetime(row, "completed_at")?,
        blocked: row.get::<i64, _>("blocked") != 0,
        blocker_note: row.get("blocker_note"),
        priority: row.get("priority"),
        notes: row.get("notes"),
        created_at: super::read_datetime(row, "created_at")?,
        updated_at: super::read_datetime(row, "updated_at")?,
        action_count,
        completed_count,
        progress,
    })
}

#[derive(Debug, Default)]
pub struct ProjectFilters {
    pub status: Option<ProjectStatus>,
    pub domain: Option<String>,
}

pub async fn list(pool: &SqlitePool, filters: &ProjectFilters) -> Result<Vec<Project>> {
    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_WITH_COUNTS);
    qb.push(" WHERE 1=1");

    if let Some(status) = filters.status {
        qb.push(" AND p.status = ").push_bind(status.as_str());
    }
    if let Some(domain) = &filters.domain {
        qb.push(" AND p.domain = ").push_bind(domain.clone());
    }

    qb.push(" ORDER BY p.priority DESC, p.target_date ASC NULLS LAST, p.created_at DESC");

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Project>> {
    let row = sqlx::query(&format!("{} WHERE p.id = ?", SELECT_WITH_COUNTS))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

/// Actions owned by a project, done last, then by due date.
pub async fn actions(pool: &SqlitePool, project_id: i64) -> Result<Vec<Action>> {
    let rows = sqlx::query(
        "SELECT * FROM actions WHERE project_id = ? \
         ORDER BY status = 'done' ASC, due_date ASC NULLS LAST",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(super::actions::from_row).collect()
}

#[derive(Debug)]
pub struct NewProject {
    pub name: String,
    pub status: ProjectStatus,
    pub outcome: Option<String>,
    pub success_criteria: Option<Vec<String>>,
    pub area_id: Option<i64>,
    pub domain: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub priority: String,
    pub notes: Option<String>,
}

pub async fn insert(pool: &SqlitePool, new: &NewProject) -> Result<Project> {
    let now = time::format_datetime(&time::now());
    let criteria = new
        .success_criteria
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;

    let result = sqlx::query(
        r#"
        INSERT INTO projects (
            name, status, outcome, success_criteria,
            area_id, domain, target_date, priority, notes,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(new.status.as_str())
    .bind(&new.outcome)
    .bind(&criteria)
    .bind(new.area_id)
    .bind(&new.domain)
    .bind(new.target_date.map(|d| d.to_string()))
    .bind(&new.priority)
    .bind(&new.notes)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inserted project {} not found", id)))
}

/// Partial update. Name/status/outcome/priority and success criteria
/// coalesce; area, domain, target date, blocked flag, blocker note and
/// notes are overwritten verbatim.
#[derive(Debug, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub outcome: Option<String>,
    pub success_criteria: Option<Vec<String>>,
    pub area_id: Option<i64>,
    pub domain: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub blocked: bool,
    pub blocker_note: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

pub async fn update(pool: &SqlitePool, id: i64, upd: &ProjectUpdate) -> Result<Option<Project>> {
    let Some(existing) = get(pool, id).await? else {
        return Ok(None);
    };

    let now = time::now();
    let effective_status = upd.status.unwrap_or(existing.status);
    let completed_at = lifecycle::project_completed_at(
        effective_status,
        existing.status,
        existing.completed_at,
        now,
    );
    let criteria = upd
        .success_criteria
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;

    sqlx::query(
        r#"
        UPDATE projects SET
            name = COALESCE(?, name),
            status = ?,
            outcome = COALESCE(?, outcome),
            success_criteria = COALESCE(?, success_criteria),
            area_id = ?,
            domain = ?,
            target_date = ?,
            blocked = ?,
            blocker_note = ?,
            priority = COALESCE(?, priority),
            notes = ?,
            completed_at = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&upd.name)
    .bind(effective_status.as_str())
    .bind(&upd.outcome)
    .bind(&criteria)
    .bind(upd.area_id)
    .bind(&upd.domain)
    .bind(upd.target_date.map(|d| d.to_string()))
    .bind(upd.blocked as i64)
    .bind(&upd.blocker_note)
    .bind(&upd.priority)
    .bind(&upd.notes)
    .bind(completed_at.map(|dt| time::format_datetime(&dt)))
    .bind(time::format_datetime(&now))
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Compact project row for integration callers.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotProject {
    pub id: i64,
    pub name: String,
    pub status: ProjectStatus,
    pub area_id: Option<i64>,
    pub next_actions: i64,
    pub completed_actions: i64,
}

/// Recent projects in one status, with next/done counts, for bot replies.
pub async fn bot_list(
    pool: &SqlitePool,
    status: ProjectStatus,
    limit: i64,
) -> Result<Vec<BotProject>> {
    let rows = sqlx::query(
        "SELECT p.id, p.name, p.status, p.area_id, \
         (SELECT COUNT(*) FROM actions WHERE project_id = p.id AND status = 'next') AS next_actions, \
         (SELECT COUNT(*) FROM actions WHERE project_id = p.id AND status = 'done') AS completed_actions \
         FROM projects p WHERE p.status = ? ORDER BY p.created_at DESC LIMIT ?",
    )
    .bind(status.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let status_raw: String = row.get("status");
            let status = ProjectStatus::parse(&status_raw).ok_or_else(|| {
                Error::Internal(format!("Unknown project status '{}'", status_raw))
            })?;
            Ok(BotProject {
                id: row.get("id"),
                name: row.get("name"),
                status,
                area_id: row.get("area_id"),
                next_actions: row.get("next_actions"),
                completed_actions: row.get("completed_actions"),
            })
        })
        .collect()
}
