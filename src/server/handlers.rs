//! Request handlers

use super::{ApiError, AppState};
use crate::report::{benchmark_price, normalize, Value};
use crate::retry::retry;
use crate::telemetry::{self, CounterMetric};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Body of `POST /api/report`
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub secret: Option<String>,
}

/// Successful report response
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    /// Normalized benchmark price, `null` when the report has none
    pub report: Value,
}

/// `GET /`
pub async fn index() -> Json<serde_json::Value> {
    Json(json!({ "data": "This is custom Chainlink DataStreams API" }))
}

/// `POST /api/report`
pub async fn report(
    State(state): State<AppState>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportResponse>, ApiError> {
    let provided = body.ok().and_then(|Json(req)| req.secret);

    if !authorized(state.auth_secret.as_deref(), provided.as_deref()) {
        telemetry::increment(CounterMetric::Unauthorized);
        tracing::debug!("Rejected report request with invalid secret");
        return Err(ApiError::Unauthorized);
    }

    let gateway = &state.gateway;
    let report = retry(&state.retry, || gateway.fetch_report()).await?;

    let normalized = normalize(&report);
    telemetry::increment(CounterMetric::ReportsServed);

    Ok(Json(ReportResponse {
        report: benchmark_price(&normalized),
    }))
}

/// A request is authorized only when a non-empty secret is configured and matches
fn authorized(expected: Option<&str>, provided: Option<&str>) -> bool {
    match (expected, provided) {
        (Some(expected), Some(provided)) if !expected.is_empty() => {
            constant_time_eq(expected.as_bytes(), provided.as_bytes())
        }
        _ => false,
    }
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
