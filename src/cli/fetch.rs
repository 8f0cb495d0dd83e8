//! Fetch command implementation

use crate::config::Config;
use crate::report::{benchmark_price, normalize, ReportGateway};
use crate::retry::retry;
use crate::streams::DataStreamsClient;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Print the whole normalized report instead of the benchmark price
    #[arg(long)]
    pub full: bool,

    /// Override the total attempt budget
    #[arg(long)]
    pub attempts: Option<u32>,
}

impl FetchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = DataStreamsClient::new(
            config.streams.client_config(),
            config.streams.api_key.clone(),
            config.streams.api_secret.clone(),
        )?;
        let gateway = ReportGateway::new(Arc::new(client), config.streams.parsed_feed_id()?);

        let mut policy = config.retry.policy();
        if let Some(attempts) = self.attempts {
            policy.max_attempts = attempts;
        }

        tracing::info!(
            feed_id = %gateway.feed_id(),
            attempts = policy.effective_attempts(),
            "Fetching report"
        );

        let report = retry(&policy, || gateway.fetch_report()).await?;
        let normalized = normalize(&report);

        let output = if self.full {
            serde_json::to_string_pretty(&normalized)?
        } else {
            serde_json::to_string_pretty(&serde_json::json!({
                "report": benchmark_price(&normalized)
            }))?
        };
        println!("{}", output);

        Ok(())
    }
}
