//! CLI interface for streams-relay
//!
//! Provides subcommands for:
//! - `serve`: Run the HTTP relay
//! - `fetch`: Fetch one report and print it
//! - `config`: Show the effective configuration

mod fetch;
mod serve;

pub use fetch::FetchArgs;
pub use serve::ServeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "streams-relay")]
#[command(about = "Authenticated HTTP relay for Chainlink Data Streams price reports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP relay (default)
    Serve(ServeArgs),
    /// Fetch one report and print it as JSON
    Fetch(FetchArgs),
    /// Show the effective configuration
    Config,
}
