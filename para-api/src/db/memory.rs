//! Memory table operations
//!
//! Reference counting: only individual fetches touch `times_referenced`
//! and `last_referenced`; list, search, and context reads never do.

use para_common::{time, Error, Result};
use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::models::{Memory, MemoryStatus, MemoryType};

pub(crate) fn from_row(row: &SqliteRow) -> Result<Memory> {
    let type_raw: String = row.get("type");
    let memory_type = MemoryType::parse(&type_raw)
        .ok_or_else(|| Error::Internal(format!("Unknown memory type '{}'", type_raw)))?;
    let status_raw: String = row.get("status");
    let status = MemoryStatus::parse(&status_raw)
        .ok_or_else(|| Error::Internal(format!("Unknown memory status '{}'", status_raw)))?;

    Ok(Memory {
        id: row.get("id"),
        title: row.get("title"),
        memory_type,
        domain: row.get("domain"),
        content: row.get("content"),
        confidence: row.get("confidence"),
        times_referenced: row.get("times_referenced"),
        last_referenced: super::read_opt_datetime(row, "last_referenced")?,
        status,
        expires_at: row.get("expires_at"),
        created_at: super::read_datetime(row, "created_at")?,
    })
}

#[derive(Debug)]
pub struct MemoryFilters {
    pub memory_type: Option<MemoryType>,
    pub domain: Option<String>,
    /// None means the default active-only view
    pub status: Option<MemoryStatus>,
    pub limit: i64,
}

impl Default for MemoryFilters {
    fn default() -> Self {
        Self {
            memory_type: None,
            domain: None,
            status: None,
            limit: 50,
        }
    }
}

pub async fn list(pool: &SqlitePool, filters: &MemoryFilters) -> Result<Vec<Memory>> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM memories WHERE 1=1");

    if let Some(memory_type) = filters.memory_type {
        qb.push(" AND type = ").push_bind(memory_type.as_str());
    }
    if let Some(domain) = &filters.domain {
        qb.push(" AND domain = ").push_bind(domain.clone());
    }
    let status = filters.status.unwrap_or(MemoryStatus::Active);
    qb.push(" AND status = ").push_bind(status.as_str());

    qb.push(" ORDER BY times_referenced DESC, created_at DESC LIMIT ")
        .push_bind(filters.limit);

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

/// Fetch one memory and record the reference: bumps `times_referenced` by
/// exactly one and moves `last_referenced`. Returns the post-increment row.
pub async fn get_and_touch(pool: &SqlitePool, id: i64) -> Result<Option<Memory>> {
    if fetch(pool, id).await?.is_none() {
        return Ok(None);
    }

    sqlx::query(
        "UPDATE memories SET times_referenced = times_referenced + 1, last_referenced = ? \
         WHERE id = ?",
    )
    .bind(time::format_datetime(&time::now()))
    .bind(id)
    .execute(pool)
    .await?;

    fetch(pool, id).await
}

/// Plain fetch without touching the reference counter.
pub(crate) async fn fetch(pool: &SqlitePool, id: i64) -> Result<Option<Memory>> {
    let row = sqlx::query("SELECT * FROM memories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

#[derive(Debug)]
pub struct NewMemory {
    pub title: String,
    pub memory_type: MemoryType,
    pub domain: Option<String>,
    pub content: String,
    pub confidence: String,
    pub expires_at: Option<String>,
}

pub async fn insert(pool: &SqlitePool, new: &NewMemory) -> Result<Memory> {
    let result = sqlx::query(
        r#"
        INSERT INTO memories (
            title, type, domain, content, confidence, expires_at,
            status, times_referenced, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, 'active', 0, ?)
        "#,
    )
    .bind(&new.title)
    .bind(new.memory_type.as_str())
    .bind(&new.domain)
    .bind(&new.content)
    .bind(&new.confidence)
    .bind(&new.expires_at)
    .bind(time::format_datetime(&time::now()))
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    fetch(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inserted memory {} not found", id)))
}

#[derive(Debug, Default)]
pub struct MemoryUpdate {
    pub title: Option<String>,
    pub memory_type: Option<MemoryType>,
    pub domain: Option<String>,
    pub content: Option<String>,
    pub confidence: Option<String>,
    pub status: Option<MemoryStatus>,
    pub expires_at: Option<String>,
}

pub async fn update(pool: &SqlitePool, id: i64, upd: &MemoryUpdate) -> Result<Option<Memory>> {
    let Some(existing) = fetch(pool, id).await? else {
        return Ok(None);
    };
    // Archiving is one-way
    if existing.status == MemoryStatus::Archived && upd.status == Some(MemoryStatus::Active) {
        return Err(Error::Conflict(format!(
            "Memory {} is archived and cannot be re-activated",
            id
        )));
    }

    sqlx::query(
        r#"
        UPDATE memories SET
            title = COALESCE(?, title),
            type = COALESCE(?, type),
            domain = ?,
            content = COALESCE(?, content),
            confidence = COALESCE(?, confidence),
            status = COALESCE(?, status),
            expires_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&upd.title)
    .bind(upd.memory_type.map(|t| t.as_str()))
    .bind(&upd.domain)
    .bind(&upd.content)
    .bind(&upd.confidence)
    .bind(upd.status.map(|s| s.as_str()))
    .bind(&upd.expires_at)
    .bind(id)
    .execute(pool)
    .await?;

    fetch(pool, id).await
}

/// Soft delete: one-way archive.
pub async fn archive(pool: &SqlitePool, id: i64) -> Result<Option<Memory>> {
    if fetch(pool, id).await?.is_none() {
        return Ok(None);
    }

    sqlx::query("UPDATE memories SET status = 'archived' WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    fetch(pool, id).await
}

/// Substring search over title and content, active memories only.
pub async fn search(
    pool: &SqlitePool,
    query: &str,
    memory_type: Option<MemoryType>,
    domain: Option<&str>,
) -> Result<Vec<Memory>> {
    let pattern = format!("%{}%", query);
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT * FROM memories WHERE status = 'active' AND (title LIKE ",
    );
    qb.push_bind(pattern.clone());
    qb.push(" OR content LIKE ");
    qb.push_bind(pattern);
    qb.push(")");

    if let Some(memory_type) = memory_type {
        qb.push(" AND type = ").push_bind(memory_type.as_str());
    }
    if let Some(domain) = domain {
        qb.push(" AND domain = ").push_bind(domain.to_string());
    }

    qb.push(" ORDER BY times_referenced DESC LIMIT 20");

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

/// Context bundle for assistants entering a domain: top preferences,
/// recent decisions, established workflows, recently referenced notes.
/// Domain-global memories (NULL domain) are always included.
pub async fn context_bundle(pool: &SqlitePool, domain: &str) -> Result<serde_json::Value> {
    async fn bucket(
        pool: &SqlitePool,
        domain: &str,
        memory_type: MemoryType,
        order: &str,
        limit: i64,
    ) -> Result<Vec<Memory>> {
        let sql = format!(
            "SELECT * FROM memories WHERE type = ? AND (domain = ? OR domain IS NULL) \
             AND status = 'active' ORDER BY {} LIMIT {}",
            order, limit
        );
        let rows = sqlx::query(&sql)
            .bind(memory_type.as_str())
            .bind(domain)
            .fetch_all(pool)
            .await?;
        rows.iter().map(from_row).collect()
    }

    let preferences = bucket(
        pool,
        domain,
        MemoryType::Preference,
        "times_referenced DESC",
        10,
    )
    .await?;
    let decisions = bucket(pool, domain, MemoryType::Decision, "created_at DESC", 10).await?;
    let workflows = bucket(
        pool,
        domain,
        MemoryType::Workflow,
        "times_referenced DESC",
        5,
    )
    .await?;

    let recent_rows = sqlx::query(
        "SELECT * FROM memories WHERE (domain = ? OR domain IS NULL) AND status = 'active' \
         ORDER BY last_referenced DESC LIMIT 10",
    )
    .bind(domain)
    .fetch_all(pool)
    .await?;
    let recent: Vec<Memory> = recent_rows.iter().map(from_row).collect::<Result<_>>()?;

    let summary = json!({
        "totalPreferences": preferences.len(),
        "totalDecisions": decisions.len(),
        "totalWorkflows": workflows.len(),
    });

    Ok(json!({
        "preferences": preferences,
        "decisions": decisions,
        "workflows": workflows,
        "recent": recent,
        "summary": summary,
    }))
}
