//! Chainlink Data Streams feed client
//!
//! Signs and sends report lookups to the Data Engine REST API and decodes
//! the returned ABI payload into a [`Report`].

mod auth;
mod client;
mod decode;
mod types;

pub use auth::StreamsSigner;
pub use client::{DataStreamsClient, StreamsClientConfig, TESTNET_API_URL};
pub use decode::{decode_full_report, decode_full_report_hex, decode_report_blob};
pub use types::{FeedError, FeedId};

use crate::report::Report;
use async_trait::async_trait;

/// Trait for feed client implementations
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch the report for `feed_id` at `timestamp` (Unix seconds)
    async fn fetch_feed(&self, timestamp: i64, feed_id: &FeedId) -> Result<Report, FeedError>;
}
