//! Research journal endpoints

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::parse_date_field;
use crate::db;
use crate::db::research::NewResearchLog;
use crate::models::ResearchLog;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

/// GET /api/v1/research-log
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ResearchLog>>> {
    let logs = db::research::list(&state.db, query.limit.unwrap_or(20)).await?;
    Ok(Json(logs))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    date: Option<String>,
    family_lines: Option<Vec<String>>,
    objective: Option<String>,
    sources_consulted: Option<Vec<String>>,
    findings: Option<String>,
    new_questions: Option<String>,
    next_steps: Option<String>,
    time_spent: Option<i64>,
    confidence: Option<String>,
}

/// POST /api/v1/research-log
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<ResearchLog>)> {
    let (Some(date_raw), Some(objective)) = (
        payload.date.filter(|s| !s.is_empty()),
        payload.objective.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "date and objective are required".to_string(),
        ));
    };
    let date = parse_date_field(Some(&date_raw), "date")?
        .ok_or_else(|| ApiError::BadRequest("date is required".to_string()))?;

    let new = NewResearchLog {
        date,
        family_lines: payload.family_lines,
        objective,
        sources_consulted: payload.sources_consulted,
        findings: payload.findings,
        new_questions: payload.new_questions,
        next_steps: payload.next_steps,
        time_spent: payload.time_spent,
        confidence: payload.confidence,
    };

    let log = db::research::insert(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/research-log", get(list).post(create))
}
