//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// A single feed fetch attempt
    FetchAttempt,
    /// A full retried fetch, success or exhaustion
    FetchTotal,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Feed fetch attempts
    FetchAttempts,
    /// Failed feed fetch attempts
    FetchFailures,
    /// Retry budgets exhausted
    FetchExhausted,
    /// Requests rejected for a bad secret
    Unauthorized,
    /// Reports served
    ReportsServed,
}

impl LatencyMetric {
    pub fn name(self) -> &'static str {
        match self {
            LatencyMetric::FetchAttempt => "relay_fetch_attempt_latency_ms",
            LatencyMetric::FetchTotal => "relay_fetch_total_latency_ms",
        }
    }
}

impl CounterMetric {
    pub fn name(self) -> &'static str {
        match self {
            CounterMetric::FetchAttempts => "relay_fetch_attempts_total",
            CounterMetric::FetchFailures => "relay_fetch_failures_total",
            CounterMetric::FetchExhausted => "relay_fetch_exhausted_total",
            CounterMetric::Unauthorized => "relay_unauthorized_total",
            CounterMetric::ReportsServed => "relay_reports_served_total",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    ::metrics::histogram!(metric.name()).record(duration.as_secs_f64() * 1000.0);
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Serve the Prometheus scrape endpoint on `port`
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(port, "Prometheus metrics exporter listening");
    Ok(())
}
