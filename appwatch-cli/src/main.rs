//! Appwatch CLI
//!
//! Command-line interface for running apps in the cloud and watching their logs.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "appwatch")]
#[command(about = "Run apps in the cloud and wait for log markers", long_about = None)]
struct Cli {
    /// Cloud control plane URL
    #[arg(long, env = "APPWATCH_CLOUD_URL", default_value = "http://localhost:8080")]
    cloud_url: String,

    /// Bearer token for the control plane
    #[arg(long, env = "APPWATCH_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "appwatch_cli=info,appwatch_harness=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        cloud_url: cli.cloud_url,
        token: cli.token,
    };

    handle_command(cli.command, &config).await
}
