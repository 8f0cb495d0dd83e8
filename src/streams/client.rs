//! Data Streams REST client
//!
//! Fetches a single report per call from the Data Engine and decodes it.
//! No retries happen here; callers wrap this in [`crate::retry`].

use super::auth::StreamsSigner;
use super::decode::decode_full_report_hex;
use super::types::ReportResponse;
use super::{FeedClient, FeedError, FeedId};
use crate::report::Report;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Testnet Data Engine REST endpoint
pub const TESTNET_API_URL: &str = "https://api.testnet-dataengine.chain.link";

const REPORTS_PATH: &str = "/api/v1/reports";

/// Configuration for the Data Streams client
#[derive(Debug, Clone)]
pub struct StreamsClientConfig {
    /// REST base URL
    pub api_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for StreamsClientConfig {
    fn default() -> Self {
        Self {
            api_url: TESTNET_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// REST client for Chainlink Data Streams
#[derive(Debug, Clone)]
pub struct DataStreamsClient {
    config: StreamsClientConfig,
    signer: StreamsSigner,
    client: Client,
}

impl DataStreamsClient {
    /// Create a client with the given credentials
    pub fn new(
        config: StreamsClientConfig,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            signer: StreamsSigner::new(client_id, client_secret),
            client,
        })
    }

    /// Path and query string for a report lookup
    fn report_path(timestamp: i64, feed_id: &FeedId) -> String {
        format!(
            "{}?feedID={}&timestamp={}",
            REPORTS_PATH, feed_id, timestamp
        )
    }
}

#[async_trait]
impl FeedClient for DataStreamsClient {
    async fn fetch_feed(&self, timestamp: i64, feed_id: &FeedId) -> Result<Report, FeedError> {
        let path = Self::report_path(timestamp, feed_id);
        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);
        let now_ms = chrono::Utc::now().timestamp_millis();

        tracing::debug!(url = %url, "Fetching report from Data Streams");

        let mut request = self.client.get(&url);
        for (name, value) in self.signer.headers("GET", &path, b"", now_ms)? {
            request = request.header(name, value);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status { status, body });
        }

        let body: ReportResponse = response.json().await?;

        if !body.report.feed_id.eq_ignore_ascii_case(&feed_id.to_string()) {
            return Err(FeedError::Decode(format!(
                "requested {} but received {}",
                feed_id, body.report.feed_id
            )));
        }

        decode_full_report_hex(&body.report.full_report)
    }
}
