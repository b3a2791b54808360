//! Memory endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db;
use crate::db::memory::{MemoryFilters, MemoryUpdate, NewMemory};
use crate::models::memory::classify_capture;
use crate::models::{Memory, MemoryStatus, MemoryType};
use crate::{ApiError, ApiResult, AppState};

fn parse_type(raw: &str) -> ApiResult<MemoryType> {
    MemoryType::parse(raw).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "type must be one of: {}",
            MemoryType::ALL.map(|t| t.as_str()).join(", ")
        ))
    })
}

fn parse_status(raw: &str) -> ApiResult<MemoryStatus> {
    MemoryStatus::parse(raw)
        .ok_or_else(|| ApiError::BadRequest("status must be 'active' or 'archived'".to_string()))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "type")]
    memory_type: Option<String>,
    domain: Option<String>,
    status: Option<String>,
    limit: Option<i64>,
}

/// GET /api/v1/memory - active-only by default, most referenced first
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Memory>>> {
    let filters = MemoryFilters {
        memory_type: query.memory_type.as_deref().map(parse_type).transpose()?,
        domain: query.domain,
        status: query.status.as_deref().map(parse_status).transpose()?,
        limit: query.limit.unwrap_or(50),
    };
    let memories = db::memory::list(&state.db, &filters).await?;
    Ok(Json(memories))
}

/// GET /api/v1/memory/:id - records the reference (bumps the counter)
async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Memory>> {
    let memory = db::memory::get_and_touch(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;
    Ok(Json(memory))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    title: Option<String>,
    #[serde(rename = "type")]
    memory_type: Option<String>,
    domain: Option<String>,
    content: Option<String>,
    confidence: Option<String>,
    expires_at: Option<String>,
}

/// POST /api/v1/memory
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<Memory>)> {
    let (Some(title), Some(type_raw), Some(content)) = (
        payload.title.filter(|s| !s.is_empty()),
        payload.memory_type.filter(|s| !s.is_empty()),
        payload.content.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "title, type, and content are required".to_string(),
        ));
    };

    let new = NewMemory {
        title,
        memory_type: parse_type(&type_raw)?,
        domain: payload.domain,
        content,
        confidence: payload.confidence.unwrap_or_else(|| "inferred".to_string()),
        expires_at: payload.expires_at,
    };

    let memory = db::memory::insert(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(memory)))
}

#[derive(Debug, Deserialize)]
struct CaptureRequest {
    text: Option<String>,
    #[serde(rename = "type")]
    memory_type: Option<String>,
    domain: Option<String>,
}

/// POST /api/v1/memory/capture - quick capture with prefix
/// auto-classification when no explicit type is given
async fn capture(
    State(state): State<AppState>,
    Json(payload): Json<CaptureRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Some(text) = payload.text.filter(|s| !s.is_empty()) else {
        return Err(ApiError::BadRequest("text is required".to_string()));
    };

    let (memory_type, title) = match payload.memory_type {
        Some(raw) => (parse_type(&raw)?, text.chars().take(100).collect()),
        None => classify_capture(&text),
    };

    let new = NewMemory {
        title,
        memory_type,
        domain: payload.domain,
        content: text,
        confidence: "inferred".to_string(),
        expires_at: None,
    };

    let memory = db::memory::insert(&state.db, &new).await?;
    let message = format!("Stored as {}: \"{}\"", memory.memory_type, memory.title);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": message, "memory": memory })),
    ))
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    title: Option<String>,
    #[serde(rename = "type")]
    memory_type: Option<String>,
    domain: Option<String>,
    content: Option<String>,
    confidence: Option<String>,
    status: Option<String>,
    expires_at: Option<String>,
}

/// PUT /api/v1/memory/:id - partial update
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRequest>,
) -> ApiResult<Json<Memory>> {
    let upd = MemoryUpdate {
        title: payload.title,
        memory_type: payload.memory_type.as_deref().map(parse_type).transpose()?,
        domain: payload.domain,
        content: payload.content,
        confidence: payload.confidence,
        status: payload.status.as_deref().map(parse_status).transpose()?,
        expires_at: payload.expires_at,
    };

    let memory = db::memory::update(&state.db, id, &upd)
        .await?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;
    Ok(Json(memory))
}

/// DELETE /api/v1/memory/:id - one-way archive (soft delete)
async fn archive(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    db::memory::archive(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Memory not found".to_string()))?;
    Ok(Json(json!({ "success": true, "message": "Memory archived" })))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(rename = "type")]
    memory_type: Option<String>,
    domain: Option<String>,
}

/// GET /api/v1/memory/search/:query - substring search over title and
/// content; never touches reference counters
async fn search(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Memory>>> {
    let memory_type = params.memory_type.as_deref().map(parse_type).transpose()?;
    let memories =
        db::memory::search(&state.db, &query, memory_type, params.domain.as_deref()).await?;
    Ok(Json(memories))
}

/// GET /api/v1/memory/context/:domain - assistant context bundle
async fn context(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> ApiResult<Json<Value>> {
    let bundle = db::memory::context_bundle(&state.db, &domain).await?;
    Ok(Json(bundle))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/memory", get(list).post(create))
        .route("/api/v1/memory/capture", axum::routing::post(capture))
        .route(
            "/api/v1/memory/:id",
            get(get_one).put(update).delete(archive),
        )
        .route("/api/v1/memory/search/:query", get(search))
        .route("/api/v1/memory/context/:domain", get(context))
}
