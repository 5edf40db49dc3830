//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod app;
mod run;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Launch an app bundle, wait for a marker in its logs, then tear it down
    Run {
        /// Path to the app bundle
        bundle: PathBuf,

        #[command(flatten)]
        wait: run::WaitArgs,
    },
    /// Show the current logs of an app
    Logs {
        /// App ID
        id: String,

        /// Components to show (default: all)
        #[arg(short, long = "component")]
        components: Vec<String>,
    },
    /// Show app details
    Status {
        /// App ID
        id: String,
    },
    /// Stop an app
    Stop {
        /// App ID
        id: String,

        /// Also delete the app
        #[arg(long)]
        delete: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run { bundle, wait } => run::handle_run(&bundle, wait, config).await,
        Commands::Logs { id, components } => app::show_logs(&id, &components, config).await,
        Commands::Status { id } => app::show_status(&id, config).await,
        Commands::Stop { id, delete } => app::stop(&id, delete, config).await,
    }
}
