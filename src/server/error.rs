//! API error types

use crate::retry::RetryError;
use crate::streams::FeedError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Body sent when the retry budget is exhausted
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch report after retries";

/// Errors surfaced by the report endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    /// Secret missing or wrong
    #[error("Unauthorized")]
    Unauthorized,

    /// Every fetch attempt failed
    #[error(transparent)]
    FetchExhausted(#[from] RetryError<FeedError>),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::FetchExhausted(err) => {
                // Cause stays in the logs, never in the response
                tracing::error!(
                    attempts = err.attempts(),
                    error = %err.last_error(),
                    "Error fetching report after retries"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED_MESSAGE)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
