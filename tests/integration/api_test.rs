//! Integration tests for the HTTP surface

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use num_bigint::BigInt;
use serde_json::{json, Value as Json};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use streams_relay::report::{Report, ReportGateway, Value, DEFAULT_FEED_ID};
use streams_relay::retry::RetryPolicy;
use streams_relay::server::{create_router, AppState, FETCH_FAILED_MESSAGE};
use streams_relay::streams::{FeedClient, FeedError, FeedId};
use tower::ServiceExt;

const SECRET: &str = "s3cret";

/// Fails `failures` times, then returns `report`
struct ScriptedClient {
    failures: u32,
    report: Report,
    calls: AtomicU32,
}

impl ScriptedClient {
    fn new(failures: u32, report: Report) -> Arc<Self> {
        Arc::new(Self {
            failures,
            report,
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedClient for ScriptedClient {
    async fn fetch_feed(&self, _timestamp: i64, _feed_id: &FeedId) -> Result<Report, FeedError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.failures {
            Err(FeedError::Status {
                status: 503,
                body: format!("unavailable {}", n),
            })
        } else {
            Ok(self.report.clone())
        }
    }
}

fn big_report() -> Report {
    let price: BigInt = "123456789012345678901234567890".parse().unwrap();
    Value::object([
        ("feedId", Value::from(DEFAULT_FEED_ID)),
        ("observationsTimestamp", Value::from(1_700_000_000u32)),
        ("benchmarkPrice", Value::BigInt(price)),
    ])
}

fn app(client: Arc<ScriptedClient>, max_attempts: u32, secret: Option<&str>) -> Router {
    app_with_policy(client, RetryPolicy::new(max_attempts, Duration::ZERO), secret)
}

fn app_with_policy(
    client: Arc<ScriptedClient>,
    policy: RetryPolicy,
    secret: Option<&str>,
) -> Router {
    let feed_id: FeedId = DEFAULT_FEED_ID.parse().unwrap();
    let gateway = ReportGateway::new(client, feed_id);
    let state = AppState::new(gateway, policy, secret.map(str::to_string));
    create_router(state)
}

fn post_report(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/report")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Json) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_index() {
    let client = ScriptedClient::new(0, big_report());
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(app(client.clone(), 10, Some(SECRET)), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": "This is custom Chainlink DataStreams API" }));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_wrong_secret_is_rejected_without_fetching() {
    let client = ScriptedClient::new(0, big_report());
    let (status, body) = send(
        app(client.clone(), 10, Some(SECRET)),
        post_report(r#"{"secret": "wrong"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_missing_secret_is_rejected() {
    let client = ScriptedClient::new(0, big_report());
    let (status, _) = send(app(client.clone(), 10, Some(SECRET)), post_report("{}")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let client = ScriptedClient::new(0, big_report());
    let (status, body) = send(app(client.clone(), 10, Some(SECRET)), post_report("not json")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_unconfigured_secret_rejects_all() {
    let client = ScriptedClient::new(0, big_report());
    let (status, _) = send(app(client.clone(), 10, None), post_report(r#"{"secret": ""}"#)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_report_after_two_failures() {
    let client = ScriptedClient::new(2, big_report());
    let (status, body) = send(
        app(client.clone(), 10, Some(SECRET)),
        post_report(r#"{"secret": "s3cret"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "report": "123456789012345678901234567890" }));
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn test_report_exhausts_attempts() {
    let client = ScriptedClient::new(u32::MAX, big_report());
    let (status, body) = send(
        app(client.clone(), 4, Some(SECRET)),
        post_report(r#"{"secret": "s3cret"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": FETCH_FAILED_MESSAGE }));
    assert_eq!(client.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_report_waits_between_attempts() {
    let client = ScriptedClient::new(u32::MAX, big_report());
    let policy = RetryPolicy::new(4, Duration::from_millis(100));
    let started = tokio::time::Instant::now();
    let (status, _) = send(
        app_with_policy(client.clone(), policy, Some(SECRET)),
        post_report(r#"{"secret": "s3cret"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(client.calls(), 4);
    // Three pauses for four attempts, none after the last
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(400));
}

#[tokio::test]
async fn test_report_without_benchmark_price() {
    let report = Value::object([("price", Value::BigInt(BigInt::from(5)))]);
    let client = ScriptedClient::new(0, report);
    let (status, body) = send(
        app(client.clone(), 10, Some(SECRET)),
        post_report(r#"{"secret": "s3cret"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "report": null }));
}

#[tokio::test]
async fn test_small_numeric_price_passes_through() {
    let report = Value::object([("benchmarkPrice", Value::from(42u32))]);
    let client = ScriptedClient::new(0, report);
    let (status, body) = send(
        app(client.clone(), 10, Some(SECRET)),
        post_report(r#"{"secret": "s3cret"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "report": 42 }));
}

#[tokio::test]
async fn test_cors_headers_present() {
    let client = ScriptedClient::new(0, big_report());
    let request = Request::builder()
        .uri("/")
        .header("origin", "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app(client, 10, Some(SECRET)).oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
