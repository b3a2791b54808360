//! Resource endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db;
use crate::db::resources::{NewResource, ResourceFilters, ResourceUpdate};
use crate::models::Resource;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "type")]
    resource_type: Option<String>,
    domain: Option<String>,
}

/// GET /api/v1/resources
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Resource>>> {
    let filters = ResourceFilters {
        resource_type: query.resource_type,
        domain: query.domain,
    };
    let resources = db::resources::list(&state.db, &filters).await?;
    Ok(Json(resources))
}

/// GET /api/v1/resources/:id
async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Resource>> {
    let resource = db::resources::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Resource not found".to_string()))?;
    Ok(Json(resource))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    name: Option<String>,
    #[serde(rename = "type")]
    resource_type: Option<String>,
    domain: Option<String>,
    description: Option<String>,
    content: Option<String>,
    location: Option<String>,
    tags: Option<Vec<String>>,
    area_id: Option<i64>,
    version: Option<String>,
    update_frequency: Option<String>,
}

/// POST /api/v1/resources
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<Resource>)> {
    let Some(name) = payload.name.filter(|n| !n.is_empty()) else {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    };

    let new = NewResource {
        name,
        resource_type: payload.resource_type,
        domain: payload.domain,
        description: payload.description,
        content: payload.content,
        location: payload.location,
        tags: payload.tags,
        area_id: payload.area_id,
        version: payload.version,
        update_frequency: payload.update_frequency,
    };

    let resource = db::resources::insert(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    name: Option<String>,
    #[serde(rename = "type")]
    resource_type: Option<String>,
    domain: Option<String>,
    description: Option<String>,
    content: Option<String>,
    location: Option<String>,
    tags: Option<Vec<String>>,
    area_id: Option<i64>,
    version: Option<String>,
    update_frequency: Option<String>,
}

/// PUT /api/v1/resources/:id - partial update
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRequest>,
) -> ApiResult<Json<Resource>> {
    let upd = ResourceUpdate {
        name: payload.name,
        resource_type: payload.resource_type,
        domain: payload.domain,
        description: payload.description,
        content: payload.content,
        location: payload.location,
        tags: payload.tags,
        area_id: payload.area_id,
        version: payload.version,
        update_frequency: payload.update_frequency,
    };

    let resource = db::resources::update(&state.db, id, &upd)
        .await?
        .ok_or_else(|| ApiError::NotFound("Resource not found".to_string()))?;
    Ok(Json(resource))
}

/// DELETE /api/v1/resources/:id
async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    if !db::resources::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/resources", get(list).post(create))
        .route(
            "/api/v1/resources/:id",
            get(get_one).put(update).delete(remove),
        )
}
