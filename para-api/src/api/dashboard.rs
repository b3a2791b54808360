//! Dashboard aggregate endpoints
//!
//! Every response is computed on demand from current table state.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::db;
use crate::db::dashboard::{DashboardSummary, Velocity, WeeklySnapshot};
use crate::{ApiResult, AppState};

/// GET /api/v1/dashboard/summary
async fn summary(State(state): State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    Ok(Json(db::dashboard::summary(&state.db).await?))
}

/// GET /api/v1/dashboard/velocity - completion counts, histogram, streak
async fn velocity(State(state): State<AppState>) -> ApiResult<Json<Velocity>> {
    Ok(Json(db::dashboard::velocity(&state.db).await?))
}

/// GET /api/v1/dashboard/weekly-review - since-Monday snapshot plus
/// stuck projects and stale waiting items
async fn weekly_review(State(state): State<AppState>) -> ApiResult<Json<WeeklySnapshot>> {
    Ok(Json(db::dashboard::weekly_snapshot(&state.db).await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/dashboard/summary", get(summary))
        .route("/api/v1/dashboard/velocity", get(velocity))
        .route("/api/v1/dashboard/weekly-review", get(weekly_review))
}
