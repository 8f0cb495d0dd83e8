//! Report fetch gateway
//!
//! Pins the request shape sent to the feed client: the current Unix time
//! in seconds and a fixed feed ID.

use super::Report;
use crate::streams::{FeedClient, FeedError, FeedId};
use chrono::Utc;
use std::sync::Arc;

/// BTC/USD (schema v3) feed on the Data Streams testnet
pub const DEFAULT_FEED_ID: &str =
    "0x00037da06d56d083fe599397a4769a042d63aa73dc4ef57709d31e9971a5b439";

/// Fetches the configured feed's report for "now"
#[derive(Clone)]
pub struct ReportGateway {
    client: Arc<dyn FeedClient>,
    feed_id: FeedId,
}

impl ReportGateway {
    pub fn new(client: Arc<dyn FeedClient>, feed_id: FeedId) -> Self {
        Self { client, feed_id }
    }

    pub fn feed_id(&self) -> &FeedId {
        &self.feed_id
    }

    /// Fetch the latest report. A single attempt; no retries.
    pub async fn fetch_report(&self) -> Result<Report, FeedError> {
        let timestamp = Utc::now().timestamp();
        self.client.fetch_feed(timestamp, &self.feed_id).await
    }
}
