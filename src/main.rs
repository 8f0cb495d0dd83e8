use clap::Parser;
use streams_relay::cli::{Cli, Commands, ServeArgs};
use streams_relay::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .map_err(|e| anyhow::anyhow!("Could not load config from {}: {}", path, e))?,
        None => Config::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;

    // Initialize telemetry
    streams_relay::telemetry::init_telemetry(&config.telemetry)?;
    config.validate()?;

    match cli.command {
        None => {
            tracing::info!("Starting report relay");
            ServeArgs::default().execute(config).await?;
        }
        Some(Commands::Serve(args)) => {
            tracing::info!("Starting report relay");
            args.execute(config).await?;
        }
        Some(Commands::Fetch(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Config) => {
            println!("Current configuration:");
            println!("  Listen: {}:{}", config.server.host, config.server.port);
            println!("  Streams API: {}", config.streams.api_url);
            println!("  Feed: {}", config.streams.feed_id);
            println!(
                "  Credentials: {}",
                if config.streams.api_key.is_empty() { "unset" } else { "set" }
            );
            println!(
                "  Auth secret: {}",
                if config.auth.secret.is_some() { "set" } else { "unset" }
            );
            println!(
                "  Retry: {} attempts, {}ms delay",
                config.retry.max_attempts, config.retry.delay_ms
            );
        }
    }

    Ok(())
}
