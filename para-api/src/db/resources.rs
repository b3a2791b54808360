//! Resource table operations

use para_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::models::Resource;

pub(crate) fn from_row(row: &SqliteRow) -> Result<Resource> {
    Ok(Resource {
        id: row.get("id"),
        name: row.get("name"),
        resource_type: row.get("type"),
        domain: row.get("domain"),
        description: row.get("description"),
        content: row.get("content"),
        location: row.get("location"),
        tags: super::tags_from_column(row.get("tags")),
        area_id: row.get("area_id"),
        version: row.get("version"),
        last_updated: super::read_opt_date(row, "last_updated")?,
        update_frequency: row.get("update_frequency"),
        created_at: super::read_datetime(row, "created_at")?,
    })
}

#[derive(Debug, Default)]
pub struct ResourceFilters {
    pub resource_type: Option<String>,
    pub domain: Option<String>,
}

pub async fn list(pool: &SqlitePool, filters: &ResourceFilters) -> Result<Vec<Resource>> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM resources WHERE 1=1");

    if let Some(resource_type) = &filters.resource_type {
        qb.push(" AND type = ").push_bind(resource_type.clone());
    }
    if let Some(domain) = &filters.domain {
        qb.push(" AND domain = ").push_bind(domain.clone());
    }

    qb.push(" ORDER BY name ASC");

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Resource>> {
    let row = sqlx::query("SELECT * FROM resources WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

#[derive(Debug)]
pub struct NewResource {
    pub name: String,
    pub resource_type: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
    pub area_id: Option<i64>,
    pub version: Option<String>,
    pub update_frequency: Option<String>,
}

pub async fn insert(pool: &SqlitePool, new: &NewResource) -> Result<Resource> {
    let tags = new.tags.as_deref().map(super::tags_to_column).transpose()?;

    let result = sqlx::query(
        r#"
        INSERT INTO resources (
            name, type, domain, description, content, location,
            tags, area_id, version, update_frequency, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(&new.resource_type)
    .bind(&new.domain)
    .bind(&new.description)
    .bind(&new.content)
    .bind(&new.location)
    .bind(&tags)
    .bind(new.area_id)
    .bind(&new.version)
    .bind(&new.update_frequency)
    .bind(time::format_datetime(&time::now()))
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inserted resource {} not found", id)))
}

/// Partial update; refreshes `last_updated` to today on every edit.
#[derive(Debug, Default)]
pub struct ResourceUpdate {
    pub name: Option<String>,
    pub resource_type: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
    pub area_id: Option<i64>,
    pub version: Option<String>,
    pub update_frequency: Option<String>,
}

pub async fn update(pool: &SqlitePool, id: i64, upd: &ResourceUpdate) -> Result<Option<Resource>> {
    if get(pool, id).await?.is_none() {
        return Ok(None);
    }

    let tags = upd.tags.as_deref().map(super::tags_to_column).transpose()?;

    sqlx::query(
        r#"
        UPDATE resources SET
            name = COALESCE(?, name),
            type = COALESCE(?, type),
            domain = ?,
            description = COALESCE(?, description),
            content = ?,
            location = ?,
            tags = ?,
            area_id = ?,
            version = ?,
            last_updated = ?,
            update_frequency = COALESCE(?, update_frequency)
        WHERE id = ?
        "#,
    )
    .bind(&upd.name)
    .bind(&upd.resource_type)
    .bind(&upd.domain)
    .bind(&upd.description)
    .bind(&upd.content)
    .bind(&upd.location)
    .bind(&tags)
    .bind(upd.area_id)
    .bind(&upd.version)
    .bind(time::now().date_naive().to_string())
    .bind(&upd.update_frequency)
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM resources WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
