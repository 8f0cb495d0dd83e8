//! HTTP surface (Axum)
//!
//! - `GET /`: static informational payload
//! - `POST /api/report`: shared-secret gated, retried report fetch

mod error;
mod handlers;

pub use error::{ApiError, FETCH_FAILED_MESSAGE};
pub use handlers::{ReportRequest, ReportResponse};

use crate::config::Config;
use crate::report::ReportGateway;
use crate::retry::RetryPolicy;
use crate::streams::{DataStreamsClient, FeedClient};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: ReportGateway,
    pub retry: RetryPolicy,
    pub auth_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(gateway: ReportGateway, retry: RetryPolicy, auth_secret: Option<String>) -> Self {
        Self {
            gateway,
            retry,
            auth_secret: auth_secret.map(Arc::from),
        }
    }

    /// Build state from configuration around the given feed client
    pub fn from_config(config: &Config, client: Arc<dyn FeedClient>) -> anyhow::Result<Self> {
        let gateway = ReportGateway::new(client, config.streams.parsed_feed_id()?);
        Ok(Self::new(
            gateway,
            config.retry.policy(),
            config.auth.secret.clone(),
        ))
    }
}

/// Create the router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/report", post(handlers::report))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the relay until Ctrl-C
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let client = DataStreamsClient::new(
        config.streams.client_config(),
        config.streams.api_key.clone(),
        config.streams.api_secret.clone(),
    )?;
    let state = AppState::from_config(config, Arc::new(client))?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, feed_id = %config.streams.feed_id, "Server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
