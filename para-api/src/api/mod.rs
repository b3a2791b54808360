//! HTTP API handlers for para-api
//!
//! One module per resource. Request/response DTOs live next to their
//! handlers; entity types come from [`crate::models`].

pub mod actions;
pub mod areas;
pub mod assets;
pub mod classify;
pub mod dashboard;
pub mod health;
pub mod inbox;
pub mod integration;
pub mod memory;
pub mod projects;
pub mod research;
pub mod resources;
pub mod reviews;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{ApiError, ApiResult, AppState};
use crate::models::ActionStatus;

/// Build the root index route
pub fn root_routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET / - API overview
async fn index() -> Json<Value> {
    Json(json!({
        "name": "para API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "docs": {
            "health": "/api/health",
            "inbox": "/api/v1/inbox",
            "actions": "/api/v1/actions",
            "projects": "/api/v1/projects",
            "areas": "/api/v1/areas",
            "resources": "/api/v1/resources",
            "assets": "/api/v1/assets",
            "memory": "/api/v1/memory",
            "research": "/api/v1/research-log",
            "weeklyReviews": "/api/v1/weekly-reviews",
            "dashboard": "/api/v1/dashboard",
            "classify": "/api/v1/classify",
            "integration": "/api/v1/integration (API key required)",
        }
    }))
}

/// Parse an optional `YYYY-MM-DD` request field.
pub(crate) fn parse_date_field(
    raw: Option<&str>,
    field: &str,
) -> ApiResult<Option<chrono::NaiveDate>> {
    raw.map(|s| {
        chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| ApiError::BadRequest(format!("Invalid {} '{}': {}", field, s, e)))
    })
    .transpose()
}

/// Parse an action status, reporting the legal vocabulary on failure.
pub(crate) fn parse_action_status(raw: &str) -> ApiResult<ActionStatus> {
    ActionStatus::parse(raw).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Invalid status '{}'. Use: {}",
            raw,
            ActionStatus::ALL.map(|s| s.as_str()).join(", ")
        ))
    })
}
