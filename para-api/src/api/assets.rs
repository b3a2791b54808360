//! Asset pipeline endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::db;
use crate::db::assets::{AssetFilters, AssetUpdate, NewAsset};
use crate::models::{Asset, PipelineStage};
use crate::{ApiError, ApiResult, AppState};

fn parse_stage(raw: &str) -> ApiResult<PipelineStage> {
    PipelineStage::parse(raw).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Invalid pipeline_stage '{}'. Use: {}",
            raw,
            PipelineStage::ALL.map(|s| s.as_str()).join(", ")
        ))
    })
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    module: Option<String>,
    level: Option<String>,
    pipeline_stage: Option<String>,
    #[serde(rename = "type")]
    asset_type: Option<String>,
}

/// GET /api/v1/assets
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Asset>>> {
    let filters = AssetFilters {
        module: query.module,
        level: query.level,
        pipeline_stage: query
            .pipeline_stage
            .as_deref()
            .map(parse_stage)
            .transpose()?,
        asset_type: query.asset_type,
    };
    let assets = db::assets::list(&state.db, &filters).await?;
    Ok(Json(assets))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    name: Option<String>,
    module: Option<String>,
    level: Option<String>,
    #[serde(rename = "type")]
    asset_type: Option<String>,
    category: Option<String>,
    pipeline_stage: Option<String>,
    description: Option<String>,
    link: Option<String>,
    file_path: Option<String>,
    version: Option<String>,
    quality_score: Option<i64>,
    skills_used: Option<Vec<String>>,
    project_id: Option<i64>,
}

/// POST /api/v1/assets
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    let (Some(name), Some(module), Some(level), Some(asset_type)) = (
        payload.name.filter(|s| !s.is_empty()),
        payload.module.filter(|s| !s.is_empty()),
        payload.level.filter(|s| !s.is_empty()),
        payload.asset_type.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "name, module, level, and type are required".to_string(),
        ));
    };

    let new = NewAsset {
        name,
        module,
        level,
        asset_type,
        category: payload.category,
        pipeline_stage: payload
            .pipeline_stage
            .as_deref()
            .map(parse_stage)
            .transpose()?
            .unwrap_or(PipelineStage::Idea),
        description: payload.description,
        link: payload.link,
        file_path: payload.file_path,
        version: payload.version,
        quality_score: payload.quality_score,
        skills_used: payload.skills_used,
        project_id: payload.project_id,
    };

    let asset = db::assets::insert(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    name: Option<String>,
    module: Option<String>,
    level: Option<String>,
    #[serde(rename = "type")]
    asset_type: Option<String>,
    category: Option<String>,
    pipeline_stage: Option<String>,
    description: Option<String>,
    link: Option<String>,
    file_path: Option<String>,
    version: Option<String>,
    quality_score: Option<i64>,
    skills_used: Option<Vec<String>>,
    project_id: Option<i64>,
}

/// PUT /api/v1/assets/:id - partial update; first transition into
/// `published` stamps `published_at`
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRequest>,
) -> ApiResult<Json<Asset>> {
    let upd = AssetUpdate {
        name: payload.name,
        module: payload.module,
        level: payload.level,
        asset_type: payload.asset_type,
        category: payload.category,
        pipeline_stage: payload
            .pipeline_stage
            .as_deref()
            .map(parse_stage)
            .transpose()?,
        description: payload.description,
        link: payload.link,
        file_path: payload.file_path,
        version: payload.version,
        quality_score: payload.quality_score,
        skills_used: payload.skills_used,
        project_id: payload.project_id,
    };

    let asset = db::assets::update(&state.db, id, &upd)
        .await?
        .ok_or_else(|| ApiError::NotFound("Asset not found".to_string()))?;
    Ok(Json(asset))
}

/// GET /api/v1/assets/gap-analysis - coverage vs the expected taxonomy
async fn gap_analysis(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let analysis = db::assets::gap_analysis(&state.db).await?;
    Ok(Json(analysis))
}

/// GET /api/v1/assets/pipeline - assets grouped by stage
async fn pipeline(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let grouped = db::assets::pipeline(&state.db).await?;
    Ok(Json(grouped))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/assets", get(list).post(create))
        .route("/api/v1/assets/:id", put(update))
        .route("/api/v1/assets/gap-analysis", get(gap_analysis))
        .route("/api/v1/assets/pipeline", get(pipeline))
}
