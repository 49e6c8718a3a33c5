use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::common::setup_test_app;

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = setup_test_app()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_returns_200() {
    let (status, json) = get_json("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    let sources = json["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 5);
    assert_eq!(sources[0], "bayt");
}

#[tokio::test]
async fn search_merges_default_sources() {
    let (status, json) = get_json("/v1/search?q=rust").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    // bayt is registered but not in the endpoint's default set
    assert_eq!(json["count"], 3);
    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["site"] != "bayt"));

    let urls: Vec<&str> = rows.iter().map(|r| r["job_url"].as_str().unwrap()).collect();
    assert_eq!(
        urls.iter().filter(|u| **u == "https://jobs.example.com/rust").count(),
        1
    );
}

#[tokio::test]
async fn search_renders_salary_and_placeholders() {
    let (status, json) = get_json("/v1/search?sources=indeed").await;

    assert_eq!(status, StatusCode::OK);
    let rows = json["rows"].as_array().unwrap();
    let backend = rows
        .iter()
        .find(|r| r["title"] == "Backend Developer")
        .unwrap();
    assert_eq!(backend["salary"], "50000–70000 USD/yearly");
    assert_eq!(backend["min_amount"], 50000);
    assert_eq!(backend["interval"], "yearly");

    let rust = rows.iter().find(|r| r["title"] == "Rust Engineer").unwrap();
    assert_eq!(rust["salary"], "—");
    assert_eq!(rust["date_posted"], "—");
    assert!(rust["min_amount"].is_null());
}

#[tokio::test]
async fn search_respects_quota() {
    let (status, json) = get_json("/v1/search?sources=indeed,google&results=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn remote_filter_drops_contradicting_rows() {
    let (status, json) = get_json("/v1/search?sources=google&remote=no").await;

    assert_eq!(status, StatusCode::OK);
    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Rust Engineer");
}

#[tokio::test]
async fn bad_remote_value_returns_400() {
    let (status, json) = get_json("/v1/search?remote=sometimes").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn unknown_sources_return_400() {
    let (status, json) = get_json("/v1/search?sources=monster,dice").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "unknown_source");
}

#[tokio::test]
async fn quota_over_limit_returns_400() {
    let (status, json) = get_json("/v1/search?results=5000").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let (status, json) = get_json("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/v1/search"].is_object());
    assert!(json["paths"]["/health"].is_object());
}
