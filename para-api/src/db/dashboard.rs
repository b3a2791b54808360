//! Derived dashboard views
//!
//! Every read is a fresh query against current table state; nothing here
//! is cached or precomputed.

use chrono::NaiveDate;
use para_common::{time, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::models::{Action, Project};
use crate::services::metrics;

/// Headline counts for the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub inbox: i64,
    pub next_actions: i64,
    pub active_projects: i64,
    pub completed_today: i64,
    pub waiting_for: i64,
    pub overdue_actions: i64,
}

async fn count(pool: &SqlitePool, sql: &str) -> Result<i64> {
    Ok(sqlx::query_scalar(sql).fetch_one(pool).await?)
}

pub async fn summary(pool: &SqlitePool) -> Result<DashboardSummary> {
    Ok(DashboardSummary {
        inbox: count(pool, "SELECT COUNT(*) FROM inbox WHERE processed_at IS NULL").await?,
        next_actions: count(pool, "SELECT COUNT(*) FROM actions WHERE status = 'next'").await?,
        active_projects: count(pool, "SELECT COUNT(*) FROM projects WHERE status = 'active'")
            .await?,
        completed_today: count(
            pool,
            "SELECT COUNT(*) FROM actions \
             WHERE status = 'done' AND DATE(completed_at) = DATE('now')",
        )
        .await?,
        waiting_for: count(pool, "SELECT COUNT(*) FROM actions WHERE status = 'waiting'").await?,
        overdue_actions: count(
            pool,
            "SELECT COUNT(*) FROM actions \
             WHERE due_date < DATE('now') AND status NOT IN ('done', 'someday')",
        )
        .await?,
    })
}

#[derive(Debug, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Completion velocity over the trailing two weeks.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Velocity {
    pub this_week: i64,
    pub last_week: i64,
    pub today: i64,
    pub streak: u32,
    pub daily_breakdown: Vec<DailyCount>,
    pub trend: i64,
}

pub async fn velocity(pool: &SqlitePool) -> Result<Velocity> {
    let this_week = count(
        pool,
        "SELECT COUNT(*) FROM actions \
         WHERE status = 'done' AND completed_at >= DATE('now', '-7 days')",
    )
    .await?;

    let last_week = count(
        pool,
        "SELECT COUNT(*) FROM actions \
         WHERE status = 'done' \
         AND completed_at >= DATE('now', '-14 days') \
         AND completed_at < DATE('now', '-7 days')",
    )
    .await?;

    let today = count(
        pool,
        "SELECT COUNT(*) FROM actions \
         WHERE status = 'done' AND DATE(completed_at) = DATE('now')",
    )
    .await?;

    // Distinct completion dates over the trailing month feed the streak walk
    let date_rows = sqlx::query(
        "SELECT DISTINCT DATE(completed_at) AS day FROM actions \
         WHERE status = 'done' AND completed_at >= DATE('now', '-30 days') \
         ORDER BY day DESC",
    )
    .fetch_all(pool)
    .await?;
    let completion_dates: Vec<NaiveDate> = date_rows
        .iter()
        .map(|row| {
            let raw: String = row.get("day");
            para_common::time::parse_date(&raw)
        })
        .collect::<Result<_>>()?;

    let streak = metrics::consecutive_streak(&completion_dates, time::now().date_naive());

    let daily_rows = sqlx::query(
        "SELECT DATE(completed_at) AS day, COUNT(*) AS n FROM actions \
         WHERE status = 'done' AND completed_at >= DATE('now', '-7 days') \
         GROUP BY DATE(completed_at) ORDER BY day",
    )
    .fetch_all(pool)
    .await?;
    let daily_breakdown = daily_rows
        .iter()
        .map(|row| {
            let raw: String = row.get("day");
            Ok(DailyCount {
                date: para_common::time::parse_date(&raw)?,
                count: row.get("n"),
            })
        })
        .collect::<Result<_>>()?;

    Ok(Velocity {
        this_week,
        last_week,
        today,
        streak,
        daily_breakdown,
        trend: this_week - last_week,
    })
}

/// A waiting action with its fractional-day age.
#[derive(Debug, Serialize)]
pub struct StaleWaitingAction {
    #[serde(flatten)]
    pub action: Action,
    pub days_waiting: f64,
}

/// Since-Monday progress plus the two attention lists the weekly review
/// starts from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySnapshot {
    pub week_of: NaiveDate,
    pub actions_completed: i64,
    pub projects_completed: i64,
    pub inbox_processed: i64,
    pub stuck_projects: Vec<Project>,
    pub stale_waiting: Vec<StaleWaitingAction>,
}

pub async fn weekly_snapshot(pool: &SqlitePool) -> Result<WeeklySnapshot> {
    let week_of = time::week_monday(time::now().date_naive());
    let week_start = week_of.to_string();

    let actions_completed: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM actions WHERE status = 'done' AND completed_at >= ?",
    )
    .bind(&week_start)
    .fetch_one(pool)
    .await?;

    let projects_completed: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM projects WHERE status = 'completed' AND completed_at >= ?",
    )
    .bind(&week_start)
    .fetch_one(pool)
    .await?;

    let inbox_processed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inbox WHERE processed_at >= ?")
            .bind(&week_start)
            .fetch_one(pool)
            .await?;

    let stuck_projects = stuck_projects(pool).await?;
    let stale_waiting = stale_waiting(pool, 7.0).await?;

    Ok(WeeklySnapshot {
        week_of,
        actions_completed,
        projects_completed,
        inbox_processed,
        stuck_projects,
        stale_waiting,
    })
}

/// Active projects with no `next` action: nothing to move them forward.
pub async fn stuck_projects(pool: &SqlitePool) -> Result<Vec<Project>> {
    let rows = sqlx::query(
        "SELECT p.* FROM projects p WHERE p.status = 'active' \
         AND NOT EXISTS (SELECT 1 FROM actions a WHERE a.project_id = p.id AND a.status = 'next')",
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(super::projects::from_row).collect()
}

/// Waiting actions older than `min_days` (fractional days since capture).
pub async fn stale_waiting(pool: &SqlitePool, min_days: f64) -> Result<Vec<StaleWaitingAction>> {
    let rows = sqlx::query(
        "SELECT *, julianday('now') - julianday(created_at) AS days_waiting \
         FROM actions WHERE status = 'waiting' \
         AND julianday('now') - julianday(created_at) > ?",
    )
    .bind(min_days)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(StaleWaitingAction {
                action: super::actions::from_row(row)?,
                days_waiting: row.get("days_waiting"),
            })
        })
        .collect()
}

/// Compact counts for the integration dashboard. Overdue here excludes
/// cancelled rather than someday, matching what bot callers expect to
/// nag about.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSummary {
    pub inbox: i64,
    pub next_actions: i64,
    pub waiting: i64,
    pub active_projects: i64,
    pub overdue: i64,
}

pub async fn integration_summary(pool: &SqlitePool) -> Result<IntegrationSummary> {
    Ok(IntegrationSummary {
        inbox: count(pool, "SELECT COUNT(*) FROM inbox WHERE processed_at IS NULL").await?,
        next_actions: count(pool, "SELECT COUNT(*) FROM actions WHERE status = 'next'").await?,
        waiting: count(pool, "SELECT COUNT(*) FROM actions WHERE status = 'waiting'").await?,
        active_projects: count(pool, "SELECT COUNT(*) FROM projects WHERE status = 'active'")
            .await?,
        overdue: count(
            pool,
            "SELECT COUNT(*) FROM actions \
             WHERE due_date < DATE('now') AND status NOT IN ('done', 'cancelled')",
        )
        .await?,
    })
}

/// Most recently captured next actions, for compact bot replies.
#[derive(Debug, Serialize)]
pub struct TopAction {
    pub id: i64,
    pub title: String,
    pub context: Vec<String>,
    pub energy: Option<String>,
}

pub async fn top_next_actions(pool: &SqlitePool, limit: i64) -> Result<Vec<TopAction>> {
    let rows = sqlx::query(
        "SELECT id, title, context, energy FROM actions \
         WHERE status = 'next' ORDER BY created_at DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TopAction {
            id: row.get("id"),
            title: row.get("title"),
            context: super::tags_from_column(row.get("context")),
            energy: row.get("energy"),
        })
        .collect())
}
