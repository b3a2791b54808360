//! Classification oracle endpoints
//!
//! Thin adapters over [`crate::services::classifier`]. A missing
//! credential fails fast before any network I/O; a malformed oracle
//! answer surfaces as a parse failure and leaves stored records
//! untouched. The caller decides whether to resubmit.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::db;
use crate::db::actions::ActionFilters;
use crate::models::ActionStatus;
use crate::services::classifier::{ClassifierClient, WorkSnapshot};
use crate::{ApiError, ApiResult, AppState};

async fn client(state: &AppState) -> ApiResult<ClassifierClient> {
    let api_key = crate::config::resolve_anthropic_api_key(&state.db, &state.toml).await?;
    Ok(ClassifierClient::new(api_key)?)
}

#[derive(Debug, Deserialize)]
struct BrainDumpRequest {
    text: Option<String>,
}

/// POST /api/v1/classify/brain-dump - split free text into structured items
async fn brain_dump(
    State(state): State<AppState>,
    Json(payload): Json<BrainDumpRequest>,
) -> ApiResult<Json<Value>> {
    let Some(text) = payload.text.filter(|s| !s.is_empty()) else {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    };

    let result = client(&state).await?.brain_dump(&text).await?;
    Ok(Json(serde_json::to_value(result).map_err(|e| {
        ApiError::Internal(format!("Failed to serialize result: {}", e))
    })?))
}

#[derive(Debug, Deserialize)]
struct ProcessInboxRequest {
    inbox_id: Option<i64>,
}

/// POST /api/v1/classify/inbox - suggest a triage decision for one item.
///
/// Read-only with respect to the store: the item stays unprocessed until
/// the caller applies the suggestion through a triage endpoint.
async fn process_inbox(
    State(state): State<AppState>,
    Json(payload): Json<ProcessInboxRequest>,
) -> ApiResult<Json<Value>> {
    let Some(inbox_id) = payload.inbox_id else {
        return Err(ApiError::BadRequest("inbox_id is required".to_string()));
    };

    let item = db::inbox::get(&state.db, inbox_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Inbox item not found".to_string()))?;

    let suggestion = client(&state).await?.triage(&item.raw_input).await?;
    Ok(Json(serde_json::to_value(suggestion).map_err(|e| {
        ApiError::Internal(format!("Failed to serialize suggestion: {}", e))
    })?))
}

#[derive(Debug, Deserialize)]
struct RecommendRequest {
    energy: Option<String>,
    available_time: Option<i64>,
}

/// POST /api/v1/classify/recommend - what to work on now
async fn recommend(
    State(state): State<AppState>,
    Json(payload): Json<RecommendRequest>,
) -> ApiResult<Json<Value>> {
    let next_actions = db::actions::list(
        &state.db,
        &ActionFilters {
            status: Some(ActionStatus::Next),
            ..Default::default()
        },
    )
    .await?;

    let stale_waiting = db::dashboard::stale_waiting(&state.db, 5.0)
        .await?
        .into_iter()
        .map(|stale| (stale.action, stale.days_waiting))
        .collect();

    let projects_without_next = db::dashboard::stuck_projects(&state.db)
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();

    let snapshot = WorkSnapshot {
        energy: payload.energy.unwrap_or_else(|| "normal".to_string()),
        available_minutes: payload.available_time.unwrap_or(30),
        next_actions,
        stale_waiting,
        projects_without_next,
    };

    let result = client(&state).await?.recommend(&snapshot).await?;
    Ok(Json(serde_json::to_value(result).map_err(|e| {
        ApiError::Internal(format!("Failed to serialize result: {}", e))
    })?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/classify/brain-dump", post(brain_dump))
        .route("/api/v1/classify/inbox", post(process_inbox))
        .route("/api/v1/classify/recommend", post(recommend))
}
