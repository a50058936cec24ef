//! Integration tests for `POST /api/ask`

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

mod common;
use common::{StubCompletion, build_test_router};

async fn post_ask(app: &axum::Router, content_type: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ask")
                .header("content-type", content_type)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

async fn ask_json(app: &axum::Router, body: Value) -> (StatusCode, Value) {
    post_ask(app, "application/json", &body.to_string()).await
}

#[tokio::test]
async fn test_ask_returns_completion() {
    let stub = StubCompletion::answering("Hi there");
    let app = build_test_router(stub.clone());

    let (status, json) = ask_json(&app, json!({ "prompt": "hello" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "response": "Hi there" }));
    assert_eq!(stub.prompts(), vec!["hello".to_string()]);
}

#[tokio::test]
async fn test_ask_trims_completion() {
    let stub = StubCompletion::answering("\n  Hi there \n");
    let app = build_test_router(stub);

    let (status, json) = ask_json(&app, json!({ "prompt": "hello" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Hi there");
}

#[tokio::test]
async fn test_ask_without_prompt_is_bad_request() {
    let stub = StubCompletion::answering("unused");
    let app = build_test_router(stub.clone());

    for body in [json!({}), json!({ "prompt": "" }), json!({ "prompt": null })] {
        let (status, json) = ask_json(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "error": "No prompt provided" }));
    }

    assert!(stub.prompts().is_empty());
}

#[tokio::test]
async fn test_ask_with_unreadable_body_is_bad_request() {
    let stub = StubCompletion::answering("unused");
    let app = build_test_router(stub.clone());

    let (status, json) = post_ask(&app, "application/json", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No prompt provided");

    let (status, _) = post_ask(&app, "text/plain", "hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ask_json(&app, json!({ "prompt": 42 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(stub.prompts().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_then_recovery() {
    let stub = StubCompletion::new(vec![
        Err("Incorrect API key provided".to_string()),
        Ok("Back online".to_string()),
    ]);
    let app = build_test_router(stub.clone());

    let (status, json) = ask_json(&app, json!({ "prompt": "hello" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({ "error": "OpenAI error", "details": "Incorrect API key provided" })
    );

    let (status, json) = ask_json(&app, json!({ "prompt": "hello again" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Back online");
    assert_eq!(stub.prompts().len(), 2);
}

#[tokio::test]
async fn test_same_prompt_twice_yields_identical_independent_responses() {
    let stub = StubCompletion::answering("Deterministic");
    let app = build_test_router(stub.clone());

    let first = ask_json(&app, json!({ "prompt": "repeat" })).await;
    let second = ask_json(&app, json!({ "prompt": "repeat" })).await;

    assert_eq!(first, second);
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(stub.prompts(), vec!["repeat".to_string(), "repeat".to_string()]);
}

#[tokio::test]
async fn test_openapi_document_lists_ask_route() {
    let app = build_test_router(StubCompletion::answering("unused"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["paths"]["/api/ask"]["post"].is_object());
}
