//! External integration boundary
//!
//! Compact endpoints for bots and automations. Every route except the
//! health check requires the configured shared secret in the
//! `x-para-api-key` header (or as a bearer token); with no secret
//! configured the boundary runs open. Caller identity and version are
//! read from `x-client-id` / `x-client-version` and attached to request
//! logs for telemetry.

use axum::extract::{Path, Query, Request, State};
use axum::http::header;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use para_common::api::auth::{self, AuthError, ClientIdentity};
use para_common::time;

use super::parse_action_status;
use crate::db;
use crate::db::inbox::{TriageDecision, TriageOutcome};
use crate::models::ActionStatus;
use crate::{ApiError, ApiResult, AppState};

/// Shared-secret header name
pub const API_KEY_HEADER: &str = "x-para-api-key";

/// Require the shared secret on every protected route.
async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers();
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        });

    auth::validate_api_key(state.integration_api_key.as_deref(), provided).map_err(
        |err| match err {
            AuthError::MissingKey => {
                ApiError::Unauthorized(format!("Include the {} header", API_KEY_HEADER))
            }
            AuthError::InvalidKey => ApiError::Forbidden("Invalid API key".to_string()),
        },
    )?;

    let identity = ClientIdentity::from_headers(
        headers.get("x-client-id").and_then(|v| v.to_str().ok()),
        headers.get("x-client-version").and_then(|v| v.to_str().ok()),
    );
    tracing::info!(
        client = %identity.id,
        client_version = %identity.version,
        path = %request.uri().path(),
        "integration request"
    );

    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
struct CaptureRequest {
    text: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    context: Option<String>,
    source: Option<String>,
}

/// POST /api/v1/integration/capture - the bot's main entry point.
///
/// `type=action` creates a next action directly; anything else lands in
/// the inbox for later triage.
async fn capture(
    State(state): State<AppState>,
    Json(payload): Json<CaptureRequest>,
) -> ApiResult<Json<Value>> {
    let Some(text) = payload.text.filter(|s| !s.is_empty()) else {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    };

    if payload.kind.as_deref() == Some("action") {
        let action = db::actions::insert(
            &state.db,
            &db::actions::NewAction {
                title: text.clone(),
                status: ActionStatus::Next,
                context: Some(
                    payload
                        .context
                        .map(|c| vec![c])
                        .unwrap_or_else(|| vec!["@anywhere".to_string()]),
                ),
                energy: None,
                time_estimate: None,
                project_id: None,
                area_id: None,
                waiting_on: None,
                delegated_to: None,
                due_date: None,
                scheduled_date: None,
                source: Some(payload.source.unwrap_or_else(|| "integration".to_string())),
                ai_notes: Some("Via integration".to_string()),
            },
        )
        .await?;

        Ok(Json(json!({
            "success": true,
            "message": format!("Action created: \"{}\"", text),
            "id": action.id,
            "type": "action",
        })))
    } else {
        let item = db::inbox::insert(
            &state.db,
            &text,
            payload.source.as_deref().unwrap_or("integration"),
        )
        .await?;

        Ok(Json(json!({
            "success": true,
            "message": format!("Added to inbox: \"{}\"", text),
            "id": item.id,
            "type": "inbox",
        })))
    }
}

/// GET /api/v1/integration/dashboard - counts plus the top next actions
async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let summary = db::dashboard::integration_summary(&state.db).await?;
    let top_actions = db::dashboard::top_next_actions(&state.db, 5).await?;

    Ok(Json(json!({
        "summary": summary,
        "topActions": top_actions,
        "timestamp": time::format_datetime(&time::now()),
    })))
}

#[derive(Debug, Deserialize)]
struct ActionsQuery {
    status: Option<String>,
    limit: Option<i64>,
    context: Option<String>,
}

/// GET /api/v1/integration/actions - compact action list (default `next`)
async fn actions(
    State(state): State<AppState>,
    Query(query): Query<ActionsQuery>,
) -> ApiResult<Json<Value>> {
    let status = query
        .status
        .as_deref()
        .map(parse_action_status)
        .transpose()?
        .unwrap_or(ActionStatus::Next);
    let limit = query.limit.unwrap_or(10);

    let all = db::actions::list(
        &state.db,
        &db::actions::ActionFilters {
            status: Some(status),
            context: query.context,
            ..Default::default()
        },
    )
    .await?;

    let actions: Vec<Value> = all
        .into_iter()
        .take(limit.max(0) as usize)
        .map(|a| {
            json!({
                "id": a.id,
                "title": a.title,
                "status": a.status,
                "context": a.context,
                "energy": a.energy,
                "dueDate": a.due_date,
                "projectId": a.project_id,
            })
        })
        .collect();

    let count = actions.len();
    Ok(Json(json!({ "actions": actions, "count": count })))
}

/// POST /api/v1/integration/actions/:id/complete
async fn complete_action(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let action = db::actions::complete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Action not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Completed: \"{}\"", action.title),
        "id": id,
    })))
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: Option<String>,
}

/// POST /api/v1/integration/actions/:id/status - quick status flip.
/// Moving into or out of `done` applies the usual completion stamping.
async fn set_action_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> ApiResult<Json<Value>> {
    let Some(raw) = payload.status else {
        return Err(ApiError::BadRequest("status is required".to_string()));
    };
    let status = parse_action_status(&raw)?;
    // Bot callers never move things back to raw inbox
    if status == ActionStatus::Inbox {
        return Err(ApiError::BadRequest(
            "Invalid status 'inbox'. Use: next, waiting, scheduled, someday, done, cancelled"
                .to_string(),
        ));
    }

    let action = db::actions::set_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Action not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": format!("\"{}\" -> {}", action.title, status),
        "id": id,
        "newStatus": status,
    })))
}

#[derive(Debug, Deserialize)]
struct InboxQuery {
    limit: Option<i64>,
}

/// GET /api/v1/integration/inbox - compact unprocessed list
async fn inbox(
    State(state): State<AppState>,
    Query(query): Query<InboxQuery>,
) -> ApiResult<Json<Value>> {
    let items = db::inbox::list_unprocessed(&state.db, Some(query.limit.unwrap_or(10))).await?;

    let items: Vec<Value> = items
        .into_iter()
        .map(|i| {
            json!({
                "id": i.id,
                "text": i.raw_input,
                "source": i.source,
                "createdAt": i.created_at,
            })
        })
        .collect();

    let count = items.len();
    Ok(Json(json!({ "items": items, "count": count })))
}

#[derive(Debug, Deserialize)]
struct ProcessRequest {
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    #[serde(rename = "projectId")]
    project_id: Option<i64>,
    context: Option<String>,
    status: Option<String>,
}

/// POST /api/v1/integration/inbox/:id/process - triage one capture into
/// an action (or trash it). One-way; a second attempt conflicts.
async fn process_inbox(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProcessRequest>,
) -> ApiResult<Json<Value>> {
    let decision = match payload.kind.as_deref() {
        Some("action") => TriageDecision::Action {
            title: payload.title,
            status: payload
                .status
                .as_deref()
                .map(parse_action_status)
                .transpose()?
                .unwrap_or(ActionStatus::Next),
            context: payload.context.map(|c| vec![c]),
            project_id: payload.project_id,
        },
        Some("trash") => TriageDecision::Trash,
        _ => {
            return Err(ApiError::BadRequest(
                "Invalid type. Use \"action\" or \"trash\"".to_string(),
            ))
        }
    };

    let outcome = db::inbox::triage(&state.db, id, decision)
        .await?
        .ok_or_else(|| ApiError::NotFound("Inbox item not found".to_string()))?;

    match outcome {
        TriageOutcome::Action(action) => Ok(Json(json!({
            "success": true,
            "message": format!("Created action: \"{}\"", action.title),
            "actionId": action.id,
        }))),
        TriageOutcome::Trashed => Ok(Json(json!({
            "success": true,
            "message": "Trashed inbox item",
        }))),
    }
}

#[derive(Debug, Deserialize)]
struct ProjectsQuery {
    status: Option<String>,
    limit: Option<i64>,
}

/// GET /api/v1/integration/projects - compact project list with counts
async fn projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectsQuery>,
) -> ApiResult<Json<Value>> {
    let status = match query.status.as_deref() {
        Some(raw) => crate::models::ProjectStatus::parse(raw).ok_or_else(|| {
            ApiError::BadRequest(format!("Invalid status '{}'", raw))
        })?,
        None => crate::models::ProjectStatus::Active,
    };

    let projects = db::projects::bot_list(&state.db, status, query.limit.unwrap_or(10)).await?;
    let count = projects.len();
    Ok(Json(json!({ "projects": projects, "count": count })))
}

/// GET /api/v1/integration/health - unauthenticated liveness probe
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "para-integration-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": time::format_datetime(&time::now()),
    }))
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/v1/integration/capture", post(capture))
        .route("/api/v1/integration/dashboard", get(dashboard))
        .route("/api/v1/integration/actions", get(actions))
        .route(
            "/api/v1/integration/actions/:id/complete",
            post(complete_action),
        )
        .route(
            "/api/v1/integration/actions/:id/status",
            post(set_action_status),
        )
        .route("/api/v1/integration/inbox", get(inbox))
        .route("/api/v1/integration/inbox/:id/process", post(process_inbox))
        .route("/api/v1/integration/projects", get(projects))
        .layer(middleware::from_fn_with_state(state, require_api_key));

    Router::new()
        .route("/api/v1/integration/health", get(health))
        .merge(protected)
}
