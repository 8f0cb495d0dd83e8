//! Serve command implementation

use crate::config::Config;
use clap::Args;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        crate::server::serve(&config).await
    }
}
