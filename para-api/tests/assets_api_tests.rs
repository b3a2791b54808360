//! Asset pipeline, publication stickiness, and gap analysis tests

mod common;

use axum::http::StatusCode;
use common::{request, request_json};
use serde_json::json;

async fn create_asset(app: &axum::Router, body: serde_json::Value) -> i64 {
    let (status, created) = request_json(app, "POST", "/api/v1/assets", body).await;
    assert_eq!(status, StatusCode::CREATED);
    created["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_create_defaults_to_idea_stage() {
    let (app, _pool) = common::test_app().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/v1/assets",
        json!({ "name": "DC basics quiz", "module": "dc", "level": "base",
                "type": "question_bank" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["pipeline_stage"], "idea");
    assert!(body["published_at"].is_null());
}

#[tokio::test]
async fn test_create_requires_classification_fields() {
    let (app, _pool) = common::test_app().await;

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/v1/assets",
        json!({ "name": "Incomplete" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_publish_stamps_published_at_once() {
    let (app, _pool) = common::test_app().await;

    let id = create_asset(
        &app,
        json!({ "name": "AC module", "module": "ac", "level": "base",
                "type": "training_module", "pipeline_stage": "review" }),
    )
    .await;

    let (_, published) = request_json(
        &app,
        "PUT",
        &format!("/api/v1/assets/{}", id),
        json!({ "pipeline_stage": "published" }),
    )
    .await;
    let stamp = published["published_at"].as_str().unwrap().to_string();

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    // Move out of published and back in: the stamp never moves
    let (_, demoted) = request_json(
        &app,
        "PUT",
        &format!("/api/v1/assets/{}", id),
        json!({ "pipeline_stage": "review" }),
    )
    .await;
    assert_eq!(demoted["pipeline_stage"], "review");
    assert_eq!(demoted["published_at"].as_str().unwrap(), stamp);

    let (_, republished) = request_json(
        &app,
        "PUT",
        &format!("/api/v1/assets/{}", id),
        json!({ "pipeline_stage": "published" }),
    )
    .await;
    assert_eq!(republished["published_at"].as_str().unwrap(), stamp);
}

#[tokio::test]
async fn test_list_filters_by_stage_and_module() {
    let (app, _pool) = common::test_app().await;

    create_asset(
        &app,
        json!({ "name": "A", "module": "dc", "level": "base", "type": "lesson_plan",
                "pipeline_stage": "queued" }),
    )
    .await;
    create_asset(
        &app,
        json!({ "name": "B", "module": "ac", "level": "base", "type": "lesson_plan",
                "pipeline_stage": "queued" }),
    )
    .await;

    let (_, body) = request(&app, "GET", "/api/v1/assets?module=dc&pipeline_stage=queued").await;
    let assets = body.as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["name"], "A");
}

#[tokio::test]
async fn test_gap_analysis_counts_and_tolerates_overfill() {
    let (app, _pool) = common::test_app().await;

    // Publish one dc asset, leave one in review, and overfill the ac
    // module with four published assets (more than the three expected)
    create_asset(
        &app,
        json!({ "name": "dc1", "module": "dc", "level": "base", "type": "question_bank",
                "pipeline_stage": "published" }),
    )
    .await;
    create_asset(
        &app,
        json!({ "name": "dc2", "module": "dc", "level": "base", "type": "lesson_plan",
                "pipeline_stage": "review" }),
    )
    .await;
    for i in 0..4 {
        create_asset(
            &app,
            json!({ "name": format!("ac{}", i), "module": "ac", "level": "base",
                    "type": "question_bank", "pipeline_stage": "published" }),
        )
        .await;
    }

    let (status, body) = request(&app, "GET", "/api/v1/assets/gap-analysis").await;
    assert_eq!(status, StatusCode::OK);

    let dc = &body["analysis"]["base"]["modules"]["dc"];
    assert_eq!(dc["total"], 3);
    assert_eq!(dc["published"], 1);
    assert_eq!(dc["inProgress"], 1);
    assert_eq!(dc["missing"], 1);

    // Overfilled module reports negative missing, not clamped
    let ac = &body["analysis"]["base"]["modules"]["ac"];
    assert_eq!(ac["published"], 4);
    assert_eq!(ac["missing"], -1);

    // Base overall: 7 modules x 3 types = 21 expected, 5 published
    assert_eq!(body["analysis"]["base"]["overall"]["total"], 21);
    assert_eq!(body["analysis"]["base"]["overall"]["published"], 5);
    assert_eq!(body["baseProgress"], 24);
}

#[tokio::test]
async fn test_pipeline_view_groups_by_stage() {
    let (app, _pool) = common::test_app().await;

    create_asset(
        &app,
        json!({ "name": "Idea one", "module": "dc", "level": "base", "type": "lesson_plan" }),
    )
    .await;
    create_asset(
        &app,
        json!({ "name": "Shipped", "module": "ac", "level": "base", "type": "lesson_plan",
                "pipeline_stage": "published" }),
    )
    .await;

    let (status, body) = request(&app, "GET", "/api/v1/assets/pipeline").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["idea"].as_array().unwrap().len(), 1);
    assert_eq!(body["published"].as_array().unwrap().len(), 1);
    assert_eq!(body["queued"].as_array().unwrap().len(), 0);
    assert_eq!(body["idea"][0]["name"], "Idea one");
}
