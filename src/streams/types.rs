//! Data Streams types

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from the feed client
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Data Streams API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Malformed report: {0}")]
    Decode(String),

    #[error("Unsupported report schema version: v{0}")]
    UnsupportedVersion(u16),

    #[error("Invalid feed ID: {0}")]
    InvalidFeedId(String),

    #[error("Request signing failed: {0}")]
    Signing(String),
}

/// A 32-byte Data Streams feed identifier
///
/// The first two bytes carry the report schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedId([u8; 32]);

impl FeedId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Report schema version encoded in the feed ID
    pub fn schema_version(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]])
    }
}

impl From<[u8; 32]> for FeedId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for FeedId {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 64 {
            return Err(FeedError::InvalidFeedId(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| FeedError::InvalidFeedId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Response body of `GET /api/v1/reports`
#[derive(Debug, Deserialize)]
pub(crate) struct ReportResponse {
    pub report: ApiReport,
}

/// Report envelope as returned by the Data Engine REST API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiReport {
    #[serde(rename = "feedID")]
    pub feed_id: String,
    #[allow(dead_code)]
    pub valid_from_timestamp: Option<u64>,
    #[allow(dead_code)]
    pub observations_timestamp: Option<u64>,
    /// Hex-encoded ABI payload
    pub full_report: String,
}
