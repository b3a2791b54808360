//! Integration boundary tests: shared-secret auth and bot endpoints

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{request, request_json};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn request_with_key(
    app: &axum::Router,
    method: &str,
    uri: &str,
    key: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        builder = builder.header("x-para-api-key", key);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_open_mode_allows_unauthenticated_calls() {
    let (app, _pool) = common::test_app().await;

    let (status, body) =
        request_with_key(&app, "GET", "/api/v1/integration/dashboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["summary"]["inbox"].is_number());
}

#[tokio::test]
async fn test_missing_key_is_401_when_secret_configured() {
    let (app, _pool) = common::test_app_with_key(Some("hunter2")).await;

    let (status, body) =
        request_with_key(&app, "GET", "/api/v1/integration/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "API_KEY_REQUIRED");
}

#[tokio::test]
async fn test_wrong_key_is_403() {
    let (app, _pool) = common::test_app_with_key(Some("hunter2")).await;

    let (status, body) = request_with_key(
        &app,
        "GET",
        "/api/v1/integration/dashboard",
        Some("wrong"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "INVALID_API_KEY");
}

#[tokio::test]
async fn test_correct_key_passes() {
    let (app, _pool) = common::test_app_with_key(Some("hunter2")).await;

    let (status, _) = request_with_key(
        &app,
        "GET",
        "/api/v1/integration/dashboard",
        Some("hunter2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let (app, _pool) = common::test_app_with_key(Some("hunter2")).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/integration/dashboard")
                .header("authorization", "Bearer hunter2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_check_bypasses_auth() {
    let (app, _pool) = common::test_app_with_key(Some("hunter2")).await;

    let (status, body) =
        request_with_key(&app, "GET", "/api/v1/integration/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "para-integration-api");
}

#[tokio::test]
async fn test_capture_defaults_to_inbox() {
    let (app, _pool) = common::test_app().await;

    let (status, body) = request_with_key(
        &app,
        "POST",
        "/api/v1/integration/capture",
        None,
        Some(json!({ "text": "Buy stamps" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "inbox");

    let (_, listed) = request(&app, "GET", "/api/v1/inbox").await;
    let items = listed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["source"], "integration");
}

#[tokio::test]
async fn test_capture_as_action_skips_inbox() {
    let (app, _pool) = common::test_app().await;

    let (status, body) = request_with_key(
        &app,
        "POST",
        "/api/v1/integration/capture",
        None,
        Some(json!({ "text": "Send invoice", "type": "action", "context": "@computer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "action");
    let id = body["id"].as_i64().unwrap();

    let (_, action) = request(&app, "GET", &format!("/api/v1/actions/{}", id)).await;
    assert_eq!(action["status"], "next");
    assert_eq!(action["context"], json!(["@computer"]));

    let (_, inbox) = request(&app, "GET", "/api/v1/inbox").await;
    assert!(inbox.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_compact_action_list_defaults_to_next() {
    let (app, _pool) = common::test_app().await;

    request_json(
        &app,
        "POST",
        "/api/v1/actions",
        json!({ "title": "Next one", "status": "next" }),
    )
    .await;
    request_json(
        &app,
        "POST",
        "/api/v1/actions",
        json!({ "title": "Waiting one", "status": "waiting" }),
    )
    .await;

    let (status, body) =
        request_with_key(&app, "GET", "/api/v1/integration/actions", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["actions"][0]["title"], "Next one");
}

#[tokio::test]
async fn test_status_flip_applies_completion_stamping() {
    let (app, _pool) = common::test_app().await;

    let (_, created) = request_json(
        &app,
        "POST",
        "/api/v1/actions",
        json!({ "title": "Flip me", "status": "next" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = request_with_key(
        &app,
        "POST",
        &format!("/api/v1/integration/actions/{}/status", id),
        None,
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newStatus"], "done");

    let (_, action) = request(&app, "GET", &format!("/api/v1/actions/{}", id)).await;
    assert_eq!(action["status"], "done");
    assert!(action["completed_at"].is_string());

    // Flip back out of done: stamp clears
    request_with_key(
        &app,
        "POST",
        &format!("/api/v1/integration/actions/{}/status", id),
        None,
        Some(json!({ "status": "next" })),
    )
    .await;
    let (_, action) = request(&app, "GET", &format!("/api/v1/actions/{}", id)).await;
    assert!(action["completed_at"].is_null());
}

#[tokio::test]
async fn test_status_flip_rejects_inbox_and_unknown() {
    let (app, _pool) = common::test_app().await;

    let (_, created) = request_json(
        &app,
        "POST",
        "/api/v1/actions",
        json!({ "title": "Stay put", "status": "next" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    for bad in ["inbox", "paused"] {
        let (status, _) = request_with_key(
            &app,
            "POST",
            &format!("/api/v1/integration/actions/{}/status", id),
            None,
            Some(json!({ "status": bad })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "status '{}' must be rejected", bad);
    }
}

#[tokio::test]
async fn test_compact_project_list_includes_counts() {
    let (app, _pool) = common::test_app().await;

    let (_, project) = request_json(
        &app,
        "POST",
        "/api/v1/projects",
        json!({ "name": "Botwatched" }),
    )
    .await;
    let project_id = project["id"].as_i64().unwrap();
    request_json(
        &app,
        "POST",
        "/api/v1/actions",
        json!({ "title": "Step", "status": "next", "project_id": project_id }),
    )
    .await;

    let (status, body) =
        request_with_key(&app, "GET", "/api/v1/integration/projects", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["projects"][0]["nextActions"], 1);
    assert_eq!(body["projects"][0]["completedActions"], 0);
}
