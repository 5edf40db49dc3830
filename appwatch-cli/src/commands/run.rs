//! Run command
//!
//! Launches an app bundle in the cloud, waits for a marker in its logs and
//! releases the app on every exit path. Ctrl-C while waiting counts as a
//! failed wait, so the app is still released before the process exits.

use anyhow::{Context, Result};
use appwatch_core::domain::marker::{APPLICATION_END, FLOW_COMPONENT, Marker};
use appwatch_harness::{PollError, RetryPolicy, run_app_in_cloud};
use clap::Args;
use colored::*;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;

/// Options controlling the wait for a marker
#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Components whose logs are searched
    #[arg(short, long = "component", default_values_t = [FLOW_COMPONENT.to_string()])]
    pub components: Vec<String>,

    /// Text that signals completion
    #[arg(long, default_value = APPLICATION_END)]
    pub marker: String,

    /// Seconds between log fetches
    #[arg(long, default_value_t = 1)]
    pub interval: u64,

    /// Give up after this many log fetches
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Give up after this many seconds (0 = wait forever)
    #[arg(long, default_value_t = 900)]
    pub timeout: u64,

    /// Seconds to wait for the app to start
    #[arg(long, default_value_t = 300)]
    pub startup_timeout: u64,
}

impl WaitArgs {
    fn retry_policy(&self) -> Result<RetryPolicy> {
        let mut policy = RetryPolicy::unbounded(Duration::from_secs(self.interval));

        if let Some(max_attempts) = self.max_attempts {
            policy = policy.with_max_attempts(max_attempts);
        }
        if self.timeout > 0 {
            policy = policy.with_max_elapsed(Duration::from_secs(self.timeout));
        }

        policy.validate()?;
        Ok(policy)
    }
}

/// Handle `appwatch run`
pub async fn handle_run(bundle: &Path, args: WaitArgs, config: &Config) -> Result<()> {
    let marker = Marker::new(args.marker.clone()).context("Invalid --marker")?;
    let policy = args.retry_policy()?;

    let mut harness = config.harness();
    harness.poll_interval = policy.interval;
    harness.max_wait = policy.max_elapsed;
    harness.max_attempts = policy.max_attempts;
    harness.startup_timeout = Duration::from_secs(args.startup_timeout);
    harness.components = args.components;
    harness.validate()?;

    let mut poller = harness.poller(marker);
    let waiting_for = format!("{:?}", poller.marker().as_str());
    let components = poller.components().join(", ");

    println!(
        "{} {}",
        "Launching".bold(),
        bundle.display().to_string().cyan()
    );

    let result = run_app_in_cloud(&harness, bundle, |app| async move {
        println!(
            "  {} {} ({})",
            "▸".cyan(),
            app.name(),
            app.id().to_string().dimmed()
        );
        if let Some(url) = app.url() {
            println!("    URL: {}", url.dimmed());
        }
        println!("    Waiting for {} in {}", waiting_for.yellow(), components);

        tokio::select! {
            outcome = poller.run(&app) => Ok::<_, anyhow::Error>(outcome?),
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                println!("{} interrupted, releasing {}", "!".yellow(), app.name());
                anyhow::bail!("Interrupted before the marker was observed")
            }
        }
    })
    .await;

    match result {
        Ok(outcome) => {
            println!(
                "{} marker observed after {} fetch(es) in {:.1}s",
                "✓".green(),
                outcome.attempts,
                outcome.elapsed.as_secs_f64()
            );
            println!("  {}", outcome.matched_line.dimmed());
            Ok(())
        }
        Err(e) => {
            if let Some(PollError::Exhausted { .. }) = e.downcast_ref::<PollError>() {
                println!("{} {}", "✗".red(), e.to_string().red());
            }
            Err(e)
        }
    }
}
