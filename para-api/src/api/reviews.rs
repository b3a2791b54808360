//! Weekly review endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::parse_date_field;
use crate::db;
use crate::db::reviews::{ReviewUpsert, UpsertOutcome};
use crate::models::WeeklyReview;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

/// GET /api/v1/weekly-reviews - recent reviews, newest week first
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<WeeklyReview>>> {
    let reviews = db::reviews::list(&state.db, query.limit.unwrap_or(10)).await?;
    Ok(Json(reviews))
}

/// GET /api/v1/weekly-reviews/current - get or create this week's row
async fn current(State(state): State<AppState>) -> ApiResult<Json<WeeklyReview>> {
    let today = para_common::time::now().date_naive();
    let review = db::reviews::get_or_create_current(&state.db, today).await?;
    Ok(Json(review))
}

/// GET /api/v1/weekly-reviews/:id
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<WeeklyReview>> {
    let review = db::reviews::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;
    Ok(Json(review))
}

#[derive(Debug, Deserialize)]
struct UpsertRequest {
    week_of: Option<String>,
    actions_completed: Option<i64>,
    projects_completed: Option<i64>,
    inbox_processed: Option<i64>,
    metrics_by_domain: Option<serde_json::Value>,
    key_wins: Option<String>,
    blockers_hit: Option<String>,
    next_week_focus: Option<String>,
    ai_summary: Option<String>,
}

/// POST /api/v1/weekly-reviews - upsert keyed by week_of.
///
/// Writing a non-null `next_week_focus` marks the review complete.
async fn upsert(
    State(state): State<AppState>,
    Json(payload): Json<UpsertRequest>,
) -> ApiResult<Response> {
    let Some(week_raw) = payload.week_of.filter(|s| !s.is_empty()) else {
        return Err(ApiError::BadRequest("week_of is required".to_string()));
    };
    let week_of = parse_date_field(Some(&week_raw), "week_of")?
        .ok_or_else(|| ApiError::BadRequest("week_of is required".to_string()))?;

    let input = ReviewUpsert {
        week_of,
        actions_completed: payload.actions_completed,
        projects_completed: payload.projects_completed,
        inbox_processed: payload.inbox_processed,
        metrics_by_domain: payload.metrics_by_domain,
        key_wins: payload.key_wins,
        blockers_hit: payload.blockers_hit,
        next_week_focus: payload.next_week_focus,
        ai_summary: payload.ai_summary,
    };

    match db::reviews::upsert(&state.db, &input).await? {
        UpsertOutcome::Created(review) => {
            Ok((StatusCode::CREATED, Json(review)).into_response())
        }
        UpsertOutcome::Updated(review) => Ok(Json(review).into_response()),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/weekly-reviews", get(list).post(upsert))
        .route("/api/v1/weekly-reviews/current", get(current))
        .route("/api/v1/weekly-reviews/:id", get(get_one))
}
