use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::integration::common::{BRASS_HTML, TestSetup, setup_test_app};

async fn post_html(app: Router, html: impl Into<Body>) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::post("/summarize")
                .header("content-type", "text/html")
                .body(html.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app(TestSetup::default()).await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["models"], 2);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app(TestSetup::default()).await;

    let response = app
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["paths"]["/summarize"].is_object());
}

#[tokio::test]
async fn summarize_reports_success_and_failure_in_order() {
    let app = setup_test_app(TestSetup::default()).await;

    let (status, json) = post_html(app, BRASS_HTML).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["text_length"].as_u64().unwrap() > 0);
    assert_eq!(json["models_compared"], 2);

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0]["model_id"], "m1");
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[0]["summary"], "Summary A");
    assert_eq!(results[0]["metrics"]["input_tokens"], 10);
    assert_eq!(results[0]["metrics"]["output_tokens"], 5);
    assert_eq!(results[0]["metrics"]["output_length"], 9);

    assert_eq!(results[1]["model_id"], "m2");
    assert_eq!(results[1]["success"], false);
    let error = results[1]["error"].as_str().unwrap();
    assert!(!error.is_empty());
    assert!(error.contains("model not found"));
}

#[tokio::test]
async fn slow_model_first_still_reported_first() {
    let app = setup_test_app(TestSetup {
        models: vec!["slow", "m1", "missing"],
        ..TestSetup::default()
    })
    .await;

    let (status, json) = post_html(app, BRASS_HTML).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["model_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["slow", "m1", "missing"]);
    assert_eq!(json["results"][0]["summary"], "Slow summary");
}

#[tokio::test]
async fn missing_usage_counts_as_zero_tokens() {
    let app = setup_test_app(TestSetup {
        models: vec!["no-usage"],
        ..TestSetup::default()
    })
    .await;

    let (status, json) = post_html(app, BRASS_HTML).await;

    assert_eq!(status, StatusCode::OK);
    let result = &json["results"][0];
    assert_eq!(result["success"], true);
    assert_eq!(result["metrics"]["input_tokens"], 0);
    assert_eq!(result["metrics"]["output_tokens"], 0);
}

#[tokio::test]
async fn model_timeout_is_a_per_model_failure() {
    let app = setup_test_app(TestSetup {
        models: vec!["hang", "m1"],
        call_timeout: Duration::from_millis(300),
        ..TestSetup::default()
    })
    .await;

    let (status, json) = post_html(app, BRASS_HTML).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"][0]["success"], false);
    assert!(
        json["results"][0]["error"]
            .as_str()
            .unwrap()
            .contains("timed out")
    );
    assert_eq!(json["results"][1]["success"], true);
}

#[tokio::test]
async fn all_models_failing_still_returns_a_report() {
    let app = setup_test_app(TestSetup {
        models: vec!["nope-1", "nope-2"],
        ..TestSetup::default()
    })
    .await;

    let (status, json) = post_html(app, BRASS_HTML).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["models_compared"], 2);
    let results = json["results"].as_array().unwrap();
    assert!(results.iter().all(|r| r["success"] == false));
}

#[tokio::test]
async fn short_text_returns_400() {
    let app = setup_test_app(TestSetup {
        min_text_chars: 100,
        ..TestSetup::default()
    })
    .await;

    let (status, json) = post_html(app, BRASS_HTML).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "insufficient_content");
}

#[tokio::test]
async fn empty_body_returns_400() {
    let app = setup_test_app(TestSetup::default()).await;

    let (status, json) = post_html(app, "  \n ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing request body");
}

#[tokio::test]
async fn oversized_body_returns_413() {
    let app = setup_test_app(TestSetup {
        max_body_bytes: 64,
        ..TestSetup::default()
    })
    .await;

    let (status, _) = post_html(app, "<p>".repeat(100)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
