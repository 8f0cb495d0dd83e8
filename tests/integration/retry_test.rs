//! Integration tests for retried report fetches

use async_trait::async_trait;
use num_bigint::BigInt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use streams_relay::report::{benchmark_price, normalize, Report, ReportGateway, Value, DEFAULT_FEED_ID};
use streams_relay::retry::{retry, RetryError, RetryPolicy};
use streams_relay::streams::{FeedClient, FeedError, FeedId};

/// Always fails with a numbered decode error
#[derive(Default)]
struct FailingClient {
    calls: AtomicU32,
}

#[async_trait]
impl FeedClient for FailingClient {
    async fn fetch_feed(&self, _timestamp: i64, _feed_id: &FeedId) -> Result<Report, FeedError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Err(FeedError::Decode(format!("attempt {}", n)))
    }
}

/// Succeeds on the given attempt
struct EventuallyClient {
    succeed_on: u32,
    calls: AtomicU32,
}

#[async_trait]
impl FeedClient for EventuallyClient {
    async fn fetch_feed(&self, _timestamp: i64, _feed_id: &FeedId) -> Result<Report, FeedError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n < self.succeed_on {
            return Err(FeedError::Status {
                status: 500,
                body: String::new(),
            });
        }
        Ok(Value::object([
            ("benchmarkPrice", Value::BigInt(BigInt::from(10).pow(30))),
            ("attempt", Value::from(n)),
        ]))
    }
}

fn feed_id() -> FeedId {
    DEFAULT_FEED_ID.parse().unwrap()
}

#[tokio::test]
async fn test_gateway_exhaustion_wraps_last_error() {
    let client = Arc::new(FailingClient::default());
    let gateway = ReportGateway::new(client.clone(), feed_id());
    let policy = RetryPolicy::new(5, Duration::ZERO);

    let result = retry(&policy, || gateway.fetch_report()).await;

    match result {
        Err(RetryError::Exhausted { attempts, source }) => {
            assert_eq!(attempts, 5);
            assert!(matches!(source, FeedError::Decode(ref msg) if msg == "attempt 5"));
        }
        Ok(_) => panic!("expected exhaustion"),
    }
    assert_eq!(client.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_gateway_success_stops_retrying() {
    for succeed_on in 1..=10 {
        let client = Arc::new(EventuallyClient {
            succeed_on,
            calls: AtomicU32::new(0),
        });
        let gateway = ReportGateway::new(client.clone(), feed_id());

        let report = retry(&RetryPolicy::default(), || gateway.fetch_report())
            .await
            .unwrap();

        assert_eq!(client.calls.load(Ordering::SeqCst), succeed_on);
        assert_eq!(report.get("attempt"), Some(&Value::from(succeed_on)));
    }
}

#[tokio::test]
async fn test_default_policy_caps_total_attempts() {
    let client = Arc::new(EventuallyClient {
        succeed_on: 11,
        calls: AtomicU32::new(0),
    });
    let gateway = ReportGateway::new(client.clone(), feed_id());

    let result = retry(&RetryPolicy::default(), || gateway.fetch_report()).await;

    assert!(result.is_err());
    assert_eq!(client.calls.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_fetched_report_normalizes() {
    let client = Arc::new(EventuallyClient {
        succeed_on: 1,
        calls: AtomicU32::new(0),
    });
    let gateway = ReportGateway::new(client, feed_id());
    let report = gateway.fetch_report().await.unwrap();

    let price = benchmark_price(&normalize(&report));
    assert_eq!(price, Value::from(format!("1{}", "0".repeat(30))));
}
