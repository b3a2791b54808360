//! Project endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_date_field;
use crate::db;
use crate::db::projects::{NewProject, ProjectFilters, ProjectUpdate};
use crate::models::{Action, Project, ProjectStatus};
use crate::{ApiError, ApiResult, AppState};

fn parse_status(raw: &str) -> ApiResult<ProjectStatus> {
    ProjectStatus::parse(raw).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Invalid status '{}'. Use: {}",
            raw,
            ProjectStatus::ALL.map(|s| s.as_str()).join(", ")
        ))
    })
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
    domain: Option<String>,
}

/// GET /api/v1/projects - with derived counts and progress
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    let filters = ProjectFilters {
        status: query.status.as_deref().map(parse_status).transpose()?,
        domain: query.domain,
    };
    let projects = db::projects::list(&state.db, &filters).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/:id
async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Project>> {
    let project = db::projects::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    Ok(Json(project))
}

/// GET /api/v1/projects/:id/actions - owned actions, done last
async fn list_actions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Action>>> {
    let actions = db::projects::actions(&state.db, id).await?;
    Ok(Json(actions))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    name: Option<String>,
    status: Option<String>,
    outcome: Option<String>,
    success_criteria: Option<Vec<String>>,
    area_id: Option<i64>,
    domain: Option<String>,
    target_date: Option<String>,
    priority: Option<String>,
    notes: Option<String>,
}

/// POST /api/v1/projects
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let Some(name) = payload.name.filter(|n| !n.is_empty()) else {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    };

    let new = NewProject {
        name,
        status: payload
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or(ProjectStatus::Active),
        outcome: payload.outcome,
        success_criteria: payload.success_criteria,
        area_id: payload.area_id,
        domain: payload.domain,
        target_date: parse_date_field(payload.target_date.as_deref(), "target_date")?,
        priority: payload.priority.unwrap_or_else(|| "normal".to_string()),
        notes: payload.notes,
    };

    let project = db::projects::insert(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    name: Option<String>,
    status: Option<String>,
    outcome: Option<String>,
    success_criteria: Option<Vec<String>>,
    area_id: Option<i64>,
    domain: Option<String>,
    target_date: Option<String>,
    blocked: Option<bool>,
    blocker_note: Option<String>,
    priority: Option<String>,
    notes: Option<String>,
}

/// PUT /api/v1/projects/:id - partial update
///
/// Completing here fires the one-time `completed_at` stamp; repeated
/// completes never re-stamp.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRequest>,
) -> ApiResult<Json<Project>> {
    let upd = ProjectUpdate {
        name: payload.name,
        status: payload.status.as_deref().map(parse_status).transpose()?,
        outcome: payload.outcome,
        success_criteria: payload.success_criteria,
        area_id: payload.area_id,
        domain: payload.domain,
        target_date: parse_date_field(payload.target_date.as_deref(), "target_date")?,
        blocked: payload.blocked.unwrap_or(false),
        blocker_note: payload.blocker_note,
        priority: payload.priority,
        notes: payload.notes,
    };

    let project = db::projects::update(&state.db, id, &upd)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/:id
///
/// Owned actions keep their `project_id`; orphaned references are
/// tolerated, not errors.
async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    if !db::projects::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/projects", get(list).post(create))
        .route(
            "/api/v1/projects/:id",
            get(get_one).put(update).delete(remove),
        )
        .route("/api/v1/projects/:id/actions", get(list_actions))
}
