//! Shared test harness: in-memory database + router helpers

// Not every test binary uses every helper
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use para_common::config::TomlConfig;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use para_api::{build_router, AppState};

/// App over a fresh in-memory database (single connection so every
/// request sees the same store).
pub async fn test_app() -> (Router, SqlitePool) {
    test_app_with_key(None).await
}

/// Same, with an integration shared secret configured.
pub async fn test_app_with_key(integration_api_key: Option<&str>) -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    para_common::db::init_schema(&pool)
        .await
        .expect("Failed to initialize schema");

    let state = AppState::new(
        pool.clone(),
        integration_api_key.map(str::to_string),
        TomlConfig::default(),
    );
    (build_router(state), pool)
}

/// Issue a body-less request and decode the JSON response.
pub async fn request(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    decode(response).await
}

/// Issue a JSON request and decode the JSON response.
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    decode(response).await
}

async fn decode(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
