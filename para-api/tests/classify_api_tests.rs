//! Classification endpoint boundary tests
//!
//! The oracle itself is external; these tests exercise the validation
//! and configuration failure paths that never reach the network.

mod common;

use axum::http::StatusCode;
use common::request_json;
use serde_json::json;

/// Make sure no ambient credential leaks into the configuration-error
/// assertions below.
fn clear_oracle_env() {
    std::env::remove_var("ANTHROPIC_API_KEY");
}

#[tokio::test]
async fn test_brain_dump_requires_text() {
    let (app, _pool) = common::test_app().await;

    let (status, body) =
        request_json(&app, "POST", "/api/v1/classify/brain-dump", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_brain_dump_without_credential_is_config_error() {
    clear_oracle_env();
    let (app, _pool) = common::test_app().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/v1/classify/brain-dump",
        json!({ "text": "do things" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "CONFIG_ERROR");
}

#[tokio::test]
async fn test_process_inbox_requires_inbox_id() {
    let (app, _pool) = common::test_app().await;

    let (status, _) = request_json(&app, "POST", "/api/v1/classify/inbox", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_process_inbox_missing_item_is_404_before_oracle() {
    clear_oracle_env();
    let (app, _pool) = common::test_app().await;

    // Not-found wins over the missing credential: the item is resolved
    // before the oracle client is built
    let (status, body) = request_json(
        &app,
        "POST",
        "/api/v1/classify/inbox",
        json!({ "inbox_id": 999 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_recommend_without_credential_is_config_error() {
    clear_oracle_env();
    let (app, _pool) = common::test_app().await;

    let (status, body) =
        request_json(&app, "POST", "/api/v1/classify/recommend", json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "CONFIG_ERROR");
}

#[tokio::test]
async fn test_credential_from_settings_table_reaches_client() {
    clear_oracle_env();
    let (app, pool) = common::test_app().await;

    // A key stored in settings gets past the configuration check; the
    // request then fails at the network layer (no real endpoint), which
    // must NOT surface as CONFIG_ERROR
    sqlx::query("INSERT INTO settings (key, value) VALUES ('anthropic_api_key', 'sk-test')")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/v1/classify/brain-dump",
        json!({ "text": "plan the week" }),
    )
    .await;
    assert_ne!(body["error"]["code"], "CONFIG_ERROR");
    assert!(
        status == StatusCode::INTERNAL_SERVER_ERROR
            || status == StatusCode::BAD_GATEWAY
            || status == StatusCode::GATEWAY_TIMEOUT,
        "expected an oracle-side failure, got {}",
        status
    );
}
