//! Area table operations

use chrono::NaiveDate;
use para_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::Area;

pub(crate) fn from_row(row: &SqliteRow) -> Result<Area> {
    Ok(Area {
        id: row.get("id"),
        name: row.get("name"),
        icon: row.get("icon"),
        domain: row.get("domain"),
        description: row.get("description"),
        standard: row.get("standard"),
        responsibilities: super::tags_from_column(row.get("responsibilities")),
        health: row.get("health"),
        last_review: super::read_opt_date(row, "last_review")?,
        review_notes: row.get("review_notes"),
        review_frequency: row.get("review_frequency"),
        created_at: super::read_datetime(row, "created_at")?,
        updated_at: super::read_datetime(row, "updated_at")?,
    })
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Area>> {
    let rows = sqlx::query("SELECT * FROM areas ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Area>> {
    let row = sqlx::query("SELECT * FROM areas WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

#[derive(Debug)]
pub struct NewArea {
    pub name: String,
    pub icon: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub standard: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub review_frequency: String,
}

pub async fn insert(pool: &SqlitePool, new: &NewArea) -> Result<Area> {
    let now = time::format_datetime(&time::now());
    let responsibilities = new
        .responsibilities
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;

    let result = sqlx::query(
        r#"
        INSERT INTO areas (
            name, icon, domain, description, standard,
            responsibilities, review_frequency, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(&new.icon)
    .bind(&new.domain)
    .bind(&new.description)
    .bind(&new.standard)
    .bind(&responsibilities)
    .bind(&new.review_frequency)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inserted area {} not found", id)))
}

#[derive(Debug, Default)]
pub struct AreaUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub standard: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub health: Option<String>,
    pub last_review: Option<NaiveDate>,
    pub review_notes: Option<String>,
    pub review_frequency: Option<String>,
}

pub async fn update(pool: &SqlitePool, id: i64, upd: &AreaUpdate) -> Result<Option<Area>> {
    if get(pool, id).await?.is_none() {
        return Ok(None);
    }

    let responsibilities = upd
        .responsibilities
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;

    sqlx::query(
        r#"
        UPDATE areas SET
            name = COALESCE(?, name),
            icon = COALESCE(?, icon),
            domain = ?,
            description = COALESCE(?, description),
            standard = COALESCE(?, standard),
            responsibilities = ?,
            health = COALESCE(?, health),
            last_review = ?,
            review_notes = ?,
            review_frequency = COALESCE(?, review_frequency),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&upd.name)
    .bind(&upd.icon)
    .bind(&upd.domain)
    .bind(&upd.description)
    .bind(&upd.standard)
    .bind(&responsibilities)
    .bind(&upd.health)
    .bind(upd.last_review.map(|d| d.to_string()))
    .bind(&upd.review_notes)
    .bind(&upd.review_frequency)
    .bind(time::format_datetime(&time::now()))
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM areas WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
