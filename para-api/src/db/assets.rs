//! Asset table operations, gap analysis, pipeline view

use para_common::{time, Error, Result};
use serde_json::{json, Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::models::lifecycle;
use crate::models::{Asset, PipelineStage};

/// Curriculum taxonomy: expected modules per level. Gap analysis expects
/// one asset of each type per module.
pub const LEVELS: [&str; 3] = ["base", "advanced", "pro"];

pub fn expected_modules(level: &str) -> &'static [&'static str] {
    match level {
        "base" => &["dc", "ac", "semi", "digital", "safety", "soldering", "wire"],
        "advanced" => &["nav", "comm", "radar", "autopilot"],
        "pro" => &["troubleshooting", "certification", "management"],
        _ => &[],
    }
}

pub const ASSET_TYPES: [&str; 3] = ["question_bank", "training_module", "lesson_plan"];

pub(crate) fn from_row(row: &SqliteRow) -> Result<Asset> {
    let stage_raw: String = row.get("pipeline_stage");
    let pipeline_stage = PipelineStage::parse(&stage_raw)
        .ok_or_else(|| Error::Internal(format!("Unknown pipeline stage '{}'", stage_raw)))?;

    Ok(Asset {
        id: row.get("id"),
        name: row.get("name"),
        module: row.get("module"),
        level: row.get("level"),
        asset_type: row.get("type"),
        category: row.get("category"),
        pipeline_stage,
        description: row.get("description"),
        link: row.get("link"),
        file_path: row.get("file_path"),
        version: row.get("version"),
        quality_score: row.get("quality_score"),
        skills_used: super::tags_from_column(row.get("skills_used")),
        project_id: row.get("project_id"),
        created_at: super::read_datetime(row, "created_at")?,
        updated_at: super::read_datetime(row, "updated_at")?,
        published_at: super::read_opt_datetime(row, "published_at")?,
    })
}

#[derive(Debug, Default)]
pub struct AssetFilters {
    pub module: Option<String>,
    pub level: Option<String>,
    pub pipeline_stage: Option<PipelineStage>,
    pub asset_type: Option<String>,
}

pub async fn list(pool: &SqlitePool, filters: &AssetFilters) -> Result<Vec<Asset>> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM assets WHERE 1=1");

    if let Some(module) = &filters.module {
        qb.push(" AND module = ").push_bind(module.clone());
    }
    if let Some(level) = &filters.level {
        qb.push(" AND level = ").push_bind(level.clone());
    }
    if let Some(stage) = filters.pipeline_stage {
        qb.push(" AND pipeline_stage = ").push_bind(stage.as_str());
    }
    if let Some(asset_type) = &filters.asset_type {
        qb.push(" AND type = ").push_bind(asset_type.clone());
    }

    qb.push(" ORDER BY pipeline_stage, created_at DESC");

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Asset>> {
    let row = sqlx::query("SELECT * FROM assets WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

#[derive(Debug)]
pub struct NewAsset {
    pub name: String,
    pub module: String,
    pub level: String,
    pub asset_type: String,
    pub category: Option<String>,
    pub pipeline_stage: PipelineStage,
    pub description: Option<String>,
    pub link: Option<String>,
    pub file_path: Option<String>,
    pub version: Option<String>,
    pub quality_score: Option<i64>,
    pub skills_used: Option<Vec<String>>,
    pub project_id: Option<i64>,
}

pub async fn insert(pool: &SqlitePool, new: &NewAsset) -> Result<Asset> {
    let now = time::now();
    let now_str = time::format_datetime(&now);
    let skills = new
        .skills_used
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;
    // Creating an asset directly in `published` still records publication
    let published_at = (new.pipeline_stage == PipelineStage::Published)
        .then(|| time::format_datetime(&now));

    let result = sqlx::query(
        r#"
        INSERT INTO assets (
            name, module, level, type, category, pipeline_stage,
            description, link, file_path, version, quality_score,
            skills_used, project_id, created_at, updated_at, published_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(&new.module)
    .bind(&new.level)
    .bind(&new.asset_type)
    .bind(&new.category)
    .bind(new.pipeline_stage.as_str())
    .bind(&new.description)
    .bind(&new.link)
    .bind(&new.file_path)
    .bind(&new.version)
    .bind(new.quality_score)
    .bind(&skills)
    .bind(new.project_id)
    .bind(&now_str)
    .bind(&now_str)
    .bind(&published_at)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inserted asset {} not found", id)))
}

#[derive(Debug, Default)]
pub struct AssetUpdate {
    pub name: Option<String>,
    pub module: Option<String>,
    pub level: Option<String>,
    pub asset_type: Option<String>,
    pub category: Option<String>,
    pub pipeline_stage: Option<PipelineStage>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub file_path: Option<String>,
    pub version: Option<String>,
    pub quality_score: Option<i64>,
    pub skills_used: Option<Vec<String>>,
    pub project_id: Option<i64>,
}

pub async fn update(pool: &SqlitePool, id: i64, upd: &AssetUpdate) -> Result<Option<Asset>> {
    let Some(existing) = get(pool, id).await? else {
        return Ok(None);
    };

    let now = time::now();
    let effective_stage = upd.pipeline_stage.unwrap_or(existing.pipeline_stage);
    let published_at = lifecycle::asset_published_at(
        effective_stage,
        existing.pipeline_stage,
        existing.published_at,
        now,
    );
    let skills = upd
        .skills_used
        .as_deref()
        .map(super::tags_to_column)
        .transpose()?;

    sqlx::query(
        r#"
        UPDATE assets SET
            name = COALESCE(?, name),
            module = COALESCE(?, module),
            level = COALESCE(?, level),
            type = COALESCE(?, type),
            category = ?,
            pipeline_stage = ?,
            description = ?,
            link = ?,
            file_path = ?,
            version = ?,
            quality_score = ?,
            skills_used = COALESCE(?, skills_used),
            project_id = ?,
            published_at = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&upd.name)
    .bind(&upd.module)
    .bind(&upd.level)
    .bind(&upd.asset_type)
    .bind(&upd.category)
    .bind(effective_stage.as_str())
    .bind(&upd.description)
    .bind(&upd.link)
    .bind(&upd.file_path)
    .bind(&upd.version)
    .bind(upd.quality_score)
    .bind(&skills)
    .bind(upd.project_id)
    .bind(published_at.map(|dt| time::format_datetime(&dt)))
    .bind(time::format_datetime(&now))
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Per-module coverage against the expected taxonomy.
///
/// `missing = total - published - in_progress` can go negative when the
/// same slot is double-classified; that is reported as-is, not clamped.
pub async fn gap_analysis(pool: &SqlitePool) -> Result<Value> {
    let mut analysis = Map::new();

    for level in LEVELS {
        let mut modules = Map::new();
        let mut overall_total: i64 = 0;
        let mut overall_published: i64 = 0;

        for &module in expected_modules(level) {
            let total = ASSET_TYPES.len() as i64;

            let published: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM assets \
                 WHERE level = ? AND module = ? AND pipeline_stage = 'published'",
            )
            .bind(level)
            .bind(module)
            .fetch_one(pool)
            .await?;

            let in_progress: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM assets \
                 WHERE level = ? AND module = ? \
                 AND pipeline_stage IN ('queued', 'in_progress', 'review')",
            )
            .bind(level)
            .bind(module)
            .fetch_one(pool)
            .await?;

            modules.insert(
                module.to_string(),
                json!({
                    "total": total,
                    "published": published,
                    "inProgress": in_progress,
                    "missing": total - published - in_progress,
                }),
            );

            overall_total += total;
            overall_published += published;
        }

        analysis.insert(
            level.to_string(),
            json!({
                "modules": Value::Object(modules),
                "overall": { "total": overall_total, "published": overall_published },
            }),
        );
    }

    let base_total = analysis
        .get("base")
        .and_then(|l| l["overall"]["total"].as_i64())
        .unwrap_or(0);
    let base_published = analysis
        .get("base")
        .and_then(|l| l["overall"]["published"].as_i64())
        .unwrap_or(0);
    let base_progress = if base_total > 0 {
        ((base_published as f64 / base_total as f64) * 100.0).round() as i64
    } else {
        0
    };

    Ok(json!({
        "analysis": Value::Object(analysis),
        "baseProgress": base_progress,
    }))
}

/// All assets grouped by stage, recently-updated first within each group.
pub async fn pipeline(pool: &SqlitePool) -> Result<Value> {
    let mut groups = Map::new();

    for stage in PipelineStage::ALL {
        let rows = sqlx::query(
            "SELECT * FROM assets WHERE pipeline_stage = ? ORDER BY updated_at DESC",
        )
        .bind(stage.as_str())
        .fetch_all(pool)
        .await?;
        let assets: Vec<Asset> = rows.iter().map(from_row).collect::<Result<_>>()?;
        groups.insert(
            stage.as_str().to_string(),
            serde_json::to_value(&assets)
                .map_err(|e| Error::Internal(format!("Failed to serialize assets: {}", e)))?,
        );
    }

    Ok(Value::Object(groups))
}
