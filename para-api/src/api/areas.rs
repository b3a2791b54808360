//! Area endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_date_field;
use crate::db;
use crate::db::areas::{AreaUpdate, NewArea};
use crate::models::Area;
use crate::{ApiError, ApiResult, AppState};

/// GET /api/v1/areas
async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Area>>> {
    let areas = db::areas::list(&state.db).await?;
    Ok(Json(areas))
}

/// GET /api/v1/areas/:id
async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Area>> {
    let area = db::areas::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Area not found".to_string()))?;
    Ok(Json(area))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    name: Option<String>,
    icon: Option<String>,
    domain: Option<String>,
    description: Option<String>,
    standard: Option<String>,
    responsibilities: Option<Vec<String>>,
    review_frequency: Option<String>,
}

/// POST /api/v1/areas
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<Area>)> {
    let Some(name) = payload.name.filter(|n| !n.is_empty()) else {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    };

    let new = NewArea {
        name,
        icon: payload.icon,
        domain: payload.domain,
        description: payload.description,
        standard: payload.standard,
        responsibilities: payload.responsibilities,
        review_frequency: payload
            .review_frequency
            .unwrap_or_else(|| "monthly".to_string()),
    };

    let area = db::areas::insert(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(area)))
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    name: Option<String>,
    icon: Option<String>,
    domain: Option<String>,
    description: Option<String>,
    standard: Option<String>,
    responsibilities: Option<Vec<String>>,
    health: Option<String>,
    last_review: Option<String>,
    review_notes: Option<String>,
    review_frequency: Option<String>,
}

/// PUT /api/v1/areas/:id - partial update
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRequest>,
) -> ApiResult<Json<Area>> {
    let upd = AreaUpdate {
        name: payload.name,
        icon: payload.icon,
        domain: payload.domain,
        description: payload.description,
        standard: payload.standard,
        responsibilities: payload.responsibilities,
        health: payload.health,
        last_review: parse_date_field(payload.last_review.as_deref(), "last_review")?,
        review_notes: payload.review_notes,
        review_frequency: payload.review_frequency,
    };

    let area = db::areas::update(&state.db, id, &upd)
        .await?
        .ok_or_else(|| ApiError::NotFound("Area not found".to_string()))?;
    Ok(Json(area))
}

/// DELETE /api/v1/areas/:id
async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    if !db::areas::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Area not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/areas", get(list).post(create))
        .route("/api/v1/areas/:id", get(get_one).put(update).delete(remove))
}
