//! App command handlers
//!
//! Inspect and control apps that are already running.

use anyhow::{Context, Result};
use appwatch_core::domain::app::{App, AppStatus};
use appwatch_core::domain::log::{LogEntry, LogLevel};
use colored::*;
use uuid::Uuid;

use crate::config::Config;

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).with_context(|| format!("Invalid app ID: {}", id))
}

/// Print the current logs of an app
pub async fn show_logs(id: &str, components: &[String], config: &Config) -> Result<()> {
    let app_id = parse_id(id)?;
    let logs = config.client().fetch_logs(app_id, components).await?;

    if logs.is_empty() {
        println!("{}", "No logs found for this app.".yellow());
    } else {
        println!("{}", format!("Logs for app {}:", app_id).bold());
        println!("{}", "─".repeat(80).dimmed());
        for log in logs {
            print_log_entry(&log);
        }
        println!("{}", "─".repeat(80).dimmed());
    }

    Ok(())
}

/// Print app details
pub async fn show_status(id: &str, config: &Config) -> Result<()> {
    let app = config.client().get_app(parse_id(id)?).await?;

    print_app_details(&app);

    Ok(())
}

/// Stop an app, optionally deleting it afterwards
pub async fn stop(id: &str, delete: bool, config: &Config) -> Result<()> {
    let app_id = parse_id(id)?;
    let client = config.client();

    client
        .stop_app(app_id)
        .await
        .context("Failed to stop app")?;
    println!("{} Stopped app {}", "✓".green(), app_id);

    if delete {
        client
            .delete_app(app_id)
            .await
            .context("Failed to delete app")?;
        println!("{} Deleted app {}", "✓".green(), app_id);
    }

    Ok(())
}

/// Print detailed app information
fn print_app_details(app: &App) {
    println!("{}", "App Details:".bold());
    println!("  ID:      {}", app.id.to_string().cyan());
    println!("  Name:    {}", app.name);
    println!("  Status:  {}", colorize_status(&app.status));
    println!(
        "  Created: {}",
        app.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(url) = &app.url {
        println!("  URL:     {}", url);
    }
}

/// Print a log entry
fn print_log_entry(log: &LogEntry) {
    let level_str = format!("{:?}", log.level).to_uppercase();
    let level_colored = match log.level {
        LogLevel::Debug => level_str.dimmed(),
        LogLevel::Info => level_str.cyan(),
        LogLevel::Warning => level_str.yellow(),
        LogLevel::Error => level_str.red(),
    };

    println!(
        "{} [{}] {} {}",
        log.timestamp.format("%H:%M:%S").to_string().dimmed(),
        level_colored,
        log.component.dimmed(),
        log.message
    );
}

/// Colorize app status for display
fn colorize_status(status: &AppStatus) -> colored::ColoredString {
    let status_str = format!("{:?}", status);
    match status {
        AppStatus::Pending => status_str.yellow(),
        AppStatus::Running => status_str.cyan(),
        AppStatus::Stopping => status_str.yellow(),
        AppStatus::Stopped => status_str.dimmed(),
        AppStatus::Failed => status_str.red(),
    }
}
