//! Inbox capture endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db;
use crate::models::InboxItem;
use crate::{ApiError, ApiResult, AppState};

/// GET /api/v1/inbox - unprocessed captures, newest first
async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<InboxItem>>> {
    let items = db::inbox::list_unprocessed(&state.db, None).await?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    raw_input: Option<String>,
    source: Option<String>,
}

/// POST /api/v1/inbox
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<InboxItem>)> {
    let Some(raw_input) = payload.raw_input.filter(|s| !s.is_empty()) else {
        return Err(ApiError::BadRequest("raw_input is required".to_string()));
    };

    let item = db::inbox::insert(
        &state.db,
        &raw_input,
        payload.source.as_deref().unwrap_or("manual"),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[derive(Debug, Deserialize)]
struct ProcessRequest {
    processed_to: Option<String>,
    ai_notes: Option<String>,
}

/// POST /api/v1/inbox/:id/process - stamp an item processed (one-way)
async fn process(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProcessRequest>,
) -> ApiResult<Json<InboxItem>> {
    let item = db::inbox::mark_processed(
        &state.db,
        id,
        payload.processed_to.as_deref().unwrap_or("action"),
        payload.ai_notes.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Inbox item not found".to_string()))?;
    Ok(Json(item))
}

/// DELETE /api/v1/inbox/:id
async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    if !db::inbox::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Inbox item not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/inbox", get(list).post(create))
        .route("/api/v1/inbox/:id/process", post(process))
        .route("/api/v1/inbox/:id", delete(remove))
}
