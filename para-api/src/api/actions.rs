//! Action endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_action_status, parse_date_field};
use crate::db::actions::{ActionFilters, ActionUpdate, NewAction};
use crate::db;
use crate::models::{Action, ActionStatus};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
    context: Option<String>,
    project_id: Option<i64>,
    area_id: Option<i64>,
    urgent: Option<String>,
}

/// GET /api/v1/actions - filtered list, due date first
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Action>>> {
    let filters = ActionFilters {
        status: query.status.as_deref().map(parse_action_status).transpose()?,
        context: query.context,
        project_id: query.project_id,
        area_id: query.area_id,
        urgent: query.urgent.as_deref() == Some("true"),
    };
    let actions = db::actions::list(&state.db, &filters).await?;
    Ok(Json(actions))
}

/// GET /api/v1/actions/:id
async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Action>> {
    let action = db::actions::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Action not found".to_string()))?;
    Ok(Json(action))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    title: Option<String>,
    status: Option<String>,
    context: Option<Vec<String>>,
    energy: Option<String>,
    time_estimate: Option<String>,
    project_id: Option<i64>,
    area_id: Option<i64>,
    waiting_on: Option<String>,
    delegated_to: Option<String>,
    due_date: Option<String>,
    scheduled_date: Option<String>,
    source: Option<String>,
    ai_notes: Option<String>,
}

/// POST /api/v1/actions
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<Action>)> {
    let Some(title) = payload.title.filter(|t| !t.is_empty()) else {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    };

    let new = NewAction {
        title,
        status: payload
            .status
            .as_deref()
            .map(parse_action_status)
            .transpose()?
            .unwrap_or(ActionStatus::Inbox),
        context: payload.context,
        energy: payload.energy,
        time_estimate: payload.time_estimate,
        project_id: payload.project_id,
        area_id: payload.area_id,
        waiting_on: payload.waiting_on,
        delegated_to: payload.delegated_to,
        due_date: parse_date_field(payload.due_date.as_deref(), "due_date")?,
        scheduled_date: parse_date_field(payload.scheduled_date.as_deref(), "scheduled_date")?,
        source: payload.source,
        ai_notes: payload.ai_notes,
    };

    let action = db::actions::insert(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(action)))
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    title: Option<String>,
    status: Option<String>,
    context: Option<Vec<String>>,
    energy: Option<String>,
    time_estimate: Option<String>,
    project_id: Option<i64>,
    area_id: Option<i64>,
    waiting_on: Option<String>,
    delegated_to: Option<String>,
    due_date: Option<String>,
    scheduled_date: Option<String>,
    ai_notes: Option<String>,
}

/// PUT /api/v1/actions/:id - partial update
///
/// Title, status, context, energy, time estimate and notes coalesce to
/// their current values when omitted; project, area, waiting_on,
/// delegated_to and the date fields are written verbatim, so omitting
/// them clears the association.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRequest>,
) -> ApiResult<Json<Action>> {
    let upd = ActionUpdate {
        title: payload.title,
        status: payload
            .status
            .as_deref()
            .map(parse_action_status)
            .transpose()?,
        context: payload.context,
        energy: payload.energy,
        time_estimate: payload.time_estimate,
        project_id: payload.project_id,
        area_id: payload.area_id,
        waiting_on: payload.waiting_on,
        delegated_to: payload.delegated_to,
        due_date: parse_date_field(payload.due_date.as_deref(), "due_date")?,
        scheduled_date: parse_date_field(payload.scheduled_date.as_deref(), "scheduled_date")?,
        ai_notes: payload.ai_notes,
    };

    let action = db::actions::update(&state.db, id, &upd)
        .await?
        .ok_or_else(|| ApiError::NotFound("Action not found".to_string()))?;
    Ok(Json(action))
}

/// POST /api/v1/actions/:id/complete - idempotent
async fn complete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Action>> {
    let action = db::actions::complete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Action not found".to_string()))?;
    Ok(Json(action))
}

#[derive(Debug, Deserialize)]
struct DeferRequest {
    to_status: Option<String>,
    scheduled_date: Option<String>,
}

/// POST /api/v1/actions/:id/defer - park an action (default `someday`)
async fn defer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DeferRequest>,
) -> ApiResult<Json<Action>> {
    let to_status = payload
        .to_status
        .as_deref()
        .map(parse_action_status)
        .transpose()?
        .unwrap_or(ActionStatus::Someday);
    if !to_status.is_deferral_target() {
        return Err(ApiError::BadRequest(format!(
            "Cannot defer to terminal status '{}'",
            to_status
        )));
    }
    let scheduled_date = parse_date_field(payload.scheduled_date.as_deref(), "scheduled_date")?;

    let action = db::actions::defer(&state.db, id, to_status, scheduled_date)
        .await?
        .ok_or_else(|| ApiError::NotFound("Action not found".to_string()))?;
    Ok(Json(action))
}

/// DELETE /api/v1/actions/:id
async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    if !db::actions::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Action not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/actions", get(list).post(create))
        .route("/api/v1/actions/:id", get(get_one).put(update).delete(remove))
        .route("/api/v1/actions/:id/complete", post(complete))
        .route("/api/v1/actions/:id/defer", post(defer))
}
