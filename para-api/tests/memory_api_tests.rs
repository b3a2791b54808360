//! Memory store integration tests

mod common;

use axum::http::StatusCode;
use common::{request, request_json};
use serde_json::json;

async fn create_memory(app: &axum::Router, body: serde_json::Value) -> i64 {
    let (status, created) = request_json(app, "POST", "/api/v1/memory", body).await;
    assert_eq!(status, StatusCode::CREATED);
    created["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_create_and_list() {
    let (app, _pool) = common::test_app().await;

    let (status, created) = request_json(
        &app,
        "POST",
        "/api/v1/memory",
        json!({ "title": "Short meetings", "type": "preference",
                "content": "Keep meetings under 25 minutes" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "preference");
    assert_eq!(created["status"], "active");
    assert_eq!(created["times_referenced"], 0);
    assert_eq!(created["confidence"], "inferred");

    let (_, listed) = request(&app, "GET", "/api/v1/memory").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_type() {
    let (app, _pool) = common::test_app().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/v1/memory",
        json!({ "title": "X", "type": "opinion", "content": "Y" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("type must be one of"));
}

#[tokio::test]
async fn test_individual_fetch_increments_reference_count() {
    let (app, _pool) = common::test_app().await;

    let id = create_memory(
        &app,
        json!({ "title": "Fact", "type": "fact", "content": "The sky is blue" }),
    )
    .await;

    let (_, first) = request(&app, "GET", &format!("/api/v1/memory/{}", id)).await;
    assert_eq!(first["times_referenced"], 1);
    assert!(first["last_referenced"].is_string());

    let (_, second) = request(&app, "GET", &format!("/api/v1/memory/{}", id)).await;
    assert_eq!(second["times_referenced"], 2);
}

#[tokio::test]
async fn test_list_and_search_never_increment() {
    let (app, _pool) = common::test_app().await;

    let id = create_memory(
        &app,
        json!({ "title": "Quiet fact", "type": "fact", "content": "untouched by lists" }),
    )
    .await;

    request(&app, "GET", "/api/v1/memory").await;
    request(&app, "GET", "/api/v1/memory/search/untouched").await;
    request(&app, "GET", "/api/v1/memory/context/personal").await;

    // Fetch once: counter shows only this single reference
    let (_, fetched) = request(&app, "GET", &format!("/api/v1/memory/{}", id)).await;
    assert_eq!(fetched["times_referenced"], 1);
}

#[tokio::test]
async fn test_archive_is_soft_delete() {
    let (app, _pool) = common::test_app().await;

    let id = create_memory(
        &app,
        json!({ "title": "Old", "type": "context", "content": "stale" }),
    )
    .await;

    let (status, body) = request(&app, "DELETE", &format!("/api/v1/memory/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Memory archived");

    // Default list hides archived rows
    let (_, listed) = request(&app, "GET", "/api/v1/memory").await;
    assert!(listed.as_array().unwrap().is_empty());

    // But the row still exists under the archived filter
    let (_, archived) = request(&app, "GET", "/api/v1/memory?status=archived").await;
    assert_eq!(archived.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_matches_title_and_content() {
    let (app, _pool) = common::test_app().await;

    create_memory(
        &app,
        json!({ "title": "Deploy ritual", "type": "workflow",
                "content": "Tag, push, wait for green" }),
    )
    .await;
    create_memory(
        &app,
        json!({ "title": "Unrelated", "type": "fact", "content": "Nothing here" }),
    )
    .await;

    let (_, by_title) = request(&app, "GET", "/api/v1/memory/search/Deploy").await;
    assert_eq!(by_title.as_array().unwrap().len(), 1);

    let (_, by_content) = request(&app, "GET", "/api/v1/memory/search/green").await;
    assert_eq!(by_content.as_array().unwrap().len(), 1);

    let (_, none) = request(&app, "GET", "/api/v1/memory/search/absent").await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_quick_capture_autoclassifies() {
    let (app, _pool) = common::test_app().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/v1/memory/capture",
        json!({ "text": "I prefer async standups" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["memory"]["type"], "preference");
    assert_eq!(body["memory"]["title"], "async standups");

    let (_, decision) = request_json(
        &app,
        "POST",
        "/api/v1/memory/capture",
        json!({ "text": "Decided to drop the legacy importer" }),
    )
    .await;
    assert_eq!(decision["memory"]["type"], "decision");

    let (_, fact) = request_json(
        &app,
        "POST",
        "/api/v1/memory/capture",
        json!({ "text": "The staging box has 8GB of RAM" }),
    )
    .await;
    assert_eq!(fact["memory"]["type"], "fact");
}

#[tokio::test]
async fn test_context_bundle_shape_and_domain_filter() {
    let (app, _pool) = common::test_app().await;

    create_memory(
        &app,
        json!({ "title": "Terse replies", "type": "preference", "domain": "work",
                "content": "Prefer short emails" }),
    )
    .await;
    create_memory(
        &app,
        json!({ "title": "Global habit", "type": "preference",
                "content": "Morning planning block" }),
    )
    .await;
    create_memory(
        &app,
        json!({ "title": "Other domain", "type": "preference", "domain": "garden",
                "content": "Water at dusk" }),
    )
    .await;

    let (status, body) = request(&app, "GET", "/api/v1/memory/context/work").await;
    assert_eq!(status, StatusCode::OK);

    // Domain-specific + global, but not the other domain
    let preferences = body["preferences"].as_array().unwrap();
    assert_eq!(preferences.len(), 2);
    assert_eq!(body["summary"]["totalPreferences"], 2);
    assert!(body["decisions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_archive_is_one_way() {
    let (app, _pool) = common::test_app().await;

    let id = create_memory(
        &app,
        json!({ "title": "Gone", "type": "fact", "content": "superseded" }),
    )
    .await;
    request(&app, "DELETE", &format!("/api/v1/memory/{}", id)).await;

    let (status, body) = request_json(
        &app,
        "PUT",
        &format!("/api/v1/memory/{}", id),
        json!({ "status": "active" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_update_coalesces() {
    let (app, _pool) = common::test_app().await;

    let id = create_memory(
        &app,
        json!({ "title": "Editable", "type": "fact", "content": "v1",
                "confidence": "confirmed" }),
    )
    .await;

    let (_, updated) = request_json(
        &app,
        "PUT",
        &format!("/api/v1/memory/{}", id),
        json!({ "content": "v2" }),
    )
    .await;
    assert_eq!(updated["title"], "Editable");
    assert_eq!(updated["content"], "v2");
    assert_eq!(updated["confidence"], "confirmed");
}
