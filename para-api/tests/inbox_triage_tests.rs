//! Inbox capture and triage integration tests

mod common;

use axum::http::StatusCode;
use common::{request, request_json};
use serde_json::json;

#[tokio::test]
async fn test_capture_appears_unprocessed() {
    let (app, _pool) = common::test_app().await;

    let (status, created) = request_json(
        &app,
        "POST",
        "/api/v1/inbox",
        json!({ "raw_input": "Call the dentist" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["raw_input"], "Call the dentist");
    assert_eq!(created["source"], "manual");
    assert!(created["processed_at"].is_null());

    let (_, listed) = request(&app, "GET", "/api/v1/inbox").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_capture_requires_raw_input() {
    let (app, _pool) = common::test_app().await;

    let (status, _) = request_json(&app, "POST", "/api/v1/inbox", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_triage_to_action_creates_and_removes_from_list() {
    let (app, _pool) = common::test_app().await;

    let (_, item) = request_json(
        &app,
        "POST",
        "/api/v1/inbox",
        json!({ "raw_input": "Call the dentist" }),
    )
    .await;
    let id = item["id"].as_i64().unwrap();

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/v1/integration/inbox/{}/process", id),
        json!({ "type": "action", "title": "Call the dentist" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let action_id = body["actionId"].as_i64().unwrap();

    // Gone from the unprocessed list
    let (_, listed) = request(&app, "GET", "/api/v1/inbox").await;
    assert!(listed.as_array().unwrap().is_empty());

    // A next action with the triage defaults exists
    let (_, action) = request(&app, "GET", &format!("/api/v1/actions/{}", action_id)).await;
    assert_eq!(action["title"], "Call the dentist");
    assert_eq!(action["status"], "next");
    assert_eq!(action["context"], json!(["@anywhere"]));
    assert_eq!(action["energy"], "medium");
}

#[tokio::test]
async fn test_triage_to_trash_creates_no_action() {
    let (app, pool) = common::test_app().await;

    let (_, item) = request_json(
        &app,
        "POST",
        "/api/v1/inbox",
        json!({ "raw_input": "spam" }),
    )
    .await;
    let id = item["id"].as_i64().unwrap();

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/v1/integration/inbox/{}/process", id),
        json!({ "type": "trash" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let action_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM actions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(action_count, 0);

    let processed_to: String =
        sqlx::query_scalar("SELECT processed_to FROM inbox WHERE id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(processed_to, "trash");
}

#[tokio::test]
async fn test_second_triage_attempt_conflicts() {
    let (app, pool) = common::test_app().await;

    let (_, item) = request_json(
        &app,
        "POST",
        "/api/v1/inbox",
        json!({ "raw_input": "once only" }),
    )
    .await;
    let id = item["id"].as_i64().unwrap();

    request_json(
        &app,
        "POST",
        &format!("/api/v1/integration/inbox/{}/process", id),
        json!({ "type": "action" }),
    )
    .await;

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/v1/integration/inbox/{}/process", id),
        json!({ "type": "action" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    // No duplicate action was created
    let action_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM actions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(action_count, 1);
}

#[tokio::test]
async fn test_triage_rejects_unknown_type() {
    let (app, _pool) = common::test_app().await;

    let (_, item) = request_json(
        &app,
        "POST",
        "/api/v1/inbox",
        json!({ "raw_input": "???" }),
    )
    .await;
    let id = item["id"].as_i64().unwrap();

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/api/v1/integration/inbox/{}/process", id),
        json!({ "type": "archive" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_manual_mark_processed_is_one_way() {
    let (app, _pool) = common::test_app().await;

    let (_, item) = request_json(
        &app,
        "POST",
        "/api/v1/inbox",
        json!({ "raw_input": "note to self" }),
    )
    .await;
    let id = item["id"].as_i64().unwrap();

    let (status, processed) = request_json(
        &app,
        "POST",
        &format!("/api/v1/inbox/{}/process", id),
        json!({ "processed_to": "reference" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(processed["processed_to"], "reference");
    assert!(processed["processed_at"].is_string());

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/api/v1/inbox/{}/process", id),
        json!({ "processed_to": "trash" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_inbox_item() {
    let (app, _pool) = common::test_app().await;

    let (_, item) = request_json(
        &app,
        "POST",
        "/api/v1/inbox",
        json!({ "raw_input": "trash me" }),
    )
    .await;
    let id = item["id"].as_i64().unwrap();

    let (status, _) = request(&app, "DELETE", &format!("/api/v1/inbox/{}", id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "DELETE", &format!("/api/v1/inbox/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
