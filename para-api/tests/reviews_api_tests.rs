//! Weekly review integration tests

mod common;

use axum::http::StatusCode;
use common::{request, request_json};
use serde_json::json;

#[tokio::test]
async fn test_current_creates_monday_aligned_placeholder() {
    let (app, _pool) = common::test_app().await;

    let (status, review) = request(&app, "GET", "/api/v1/weekly-reviews/current").await;
    assert_eq!(status, StatusCode::OK);

    let week_of = review["week_of"].as_str().unwrap();
    let parsed = chrono::NaiveDate::parse_from_str(week_of, "%Y-%m-%d").unwrap();
    assert_eq!(parsed.format("%u").to_string(), "1", "week_of must be a Monday");
    assert!(review["completed_at"].is_null());

    // Second call returns the same row, not a duplicate
    let (_, again) = request(&app, "GET", "/api/v1/weekly-reviews/current").await;
    assert_eq!(again["id"], review["id"]);

    let (_, listed) = request(&app, "GET", "/api/v1/weekly-reviews").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upsert_creates_then_updates() {
    let (app, _pool) = common::test_app().await;

    let (status, created) = request_json(
        &app,
        "POST",
        "/api/v1/weekly-reviews",
        json!({ "week_of": "2026-07-27", "actions_completed": 12 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["actions_completed"], 12);
    assert!(created["completed_at"].is_null());

    // Same week again: update path, count coalesces when omitted
    let (status, updated) = request_json(
        &app,
        "POST",
        "/api/v1/weekly-reviews",
        json!({ "week_of": "2026-07-27", "key_wins": "Shipped the importer" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["actions_completed"], 12);
    assert_eq!(updated["key_wins"], "Shipped the importer");
}

#[tokio::test]
async fn test_writing_next_week_focus_completes_review() {
    let (app, _pool) = common::test_app().await;

    let (_, created) = request_json(
        &app,
        "POST",
        "/api/v1/weekly-reviews",
        json!({ "week_of": "2026-07-20" }),
    )
    .await;
    assert!(created["completed_at"].is_null());

    let (_, updated) = request_json(
        &app,
        "POST",
        "/api/v1/weekly-reviews",
        json!({ "week_of": "2026-07-20", "next_week_focus": "Close out the audit" }),
    )
    .await;
    assert_eq!(updated["next_week_focus"], "Close out the audit");
    assert!(
        updated["completed_at"].is_string(),
        "writing next_week_focus marks the review complete"
    );
}

#[tokio::test]
async fn test_upsert_requires_week_of() {
    let (app, _pool) = common::test_app().await;

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/v1/weekly-reviews",
        json!({ "key_wins": "none" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_by_id_and_404() {
    let (app, _pool) = common::test_app().await;

    let (_, created) = request_json(
        &app,
        "POST",
        "/api/v1/weekly-reviews",
        json!({ "week_of": "2026-07-13" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) =
        request(&app, "GET", &format!("/api/v1/weekly-reviews/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["week_of"], "2026-07-13");

    let (status, _) = request(&app, "GET", "/api/v1/weekly-reviews/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
