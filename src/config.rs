//! Configuration types for streams-relay
//!
//! Built once at startup from an optional TOML file plus environment
//! overrides, then shared read-only.

use crate::report::DEFAULT_FEED_ID;
use crate::retry::RetryPolicy;
use crate::streams::{FeedId, StreamsClientConfig, TESTNET_API_URL};
use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub streams: StreamsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Listen address
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3001
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Data Streams client configuration
#[derive(Clone, Deserialize)]
pub struct StreamsConfig {
    /// REST base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Client ID (`STREAMS_API_KEY`)
    #[serde(default)]
    pub api_key: String,
    /// Client secret (`STREAMS_API_SECRET`)
    #[serde(default)]
    pub api_secret: String,
    /// Feed to query
    #[serde(default = "default_feed_id")]
    pub feed_id: String,
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    TESTNET_API_URL.to_string()
}
fn default_feed_id() -> String {
    DEFAULT_FEED_ID.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for StreamsConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            api_secret: String::new(),
            feed_id: default_feed_id(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for StreamsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamsConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &redact(&self.api_secret))
            .field("feed_id", &self.feed_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl StreamsConfig {
    /// Parse the configured feed ID
    pub fn parsed_feed_id(&self) -> anyhow::Result<FeedId> {
        self.feed_id
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid streams.feed_id: {}", e))
    }

    pub fn client_config(&self) -> StreamsClientConfig {
        StreamsClientConfig {
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Endpoint authentication configuration
#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared secret expected in request bodies (`AUTH_SECRET`).
    /// When unset every report request is rejected.
    #[serde(default)]
    pub secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_deref().map(redact))
            .finish()
    }
}

/// Retry configuration for the report endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, first included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts (milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    10
}
fn default_delay_ms() -> u64 {
    100
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup`
    ///
    /// Recognized: `PORT`, `STREAMS_API_KEY`, `STREAMS_API_SECRET`,
    /// `STREAMS_API_URL`, `STREAMS_FEED_ID`, `AUTH_SECRET`, `LOG_LEVEL`.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT {:?}: {}", port, e))?;
        }
        if let Some(key) = lookup("STREAMS_API_KEY") {
            self.streams.api_key = key;
        }
        if let Some(secret) = lookup("STREAMS_API_SECRET") {
            self.streams.api_secret = secret;
        }
        if let Some(url) = lookup("STREAMS_API_URL") {
            self.streams.api_url = url;
        }
        if let Some(feed_id) = lookup("STREAMS_FEED_ID") {
            self.streams.feed_id = feed_id;
        }
        if let Some(secret) = lookup("AUTH_SECRET") {
            self.auth.secret = Some(secret);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.telemetry.log_level = level;
        }
        Ok(())
    }

    /// Check values that can only be validated after merging
    pub fn validate(&self) -> anyhow::Result<()> {
        self.streams.parsed_feed_id()?;
        if self.streams.api_key.is_empty() || self.streams.api_secret.is_empty() {
            tracing::warn!("Data Streams credentials are not set; upstream requests will be rejected");
        }
        if self.auth.secret.is_none() {
            tracing::warn!("AUTH_SECRET is not set; all report requests will be rejected");
        }
        Ok(())
    }
}
