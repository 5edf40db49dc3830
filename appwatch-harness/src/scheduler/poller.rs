//! Completion poller
//!
//! Fetches an app's logs at a fixed interval until a line contains the
//! marker or the retry policy runs out.

use appwatch_core::domain::marker::{FLOW_COMPONENT, Marker};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::scheduler::retry::RetryPolicy;
use crate::source::LogSource;

/// State of a completion poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Done,
}

/// Result of a successful poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    /// Number of fetches made, including the one that matched
    pub attempts: u32,
    /// First line that contained the marker
    pub matched_line: String,
    /// Time between the first fetch and the matching one
    pub elapsed: Duration,
}

/// Errors returned by the completion poller
#[derive(Debug, Error)]
pub enum PollError {
    /// The retry policy ran out before the marker appeared
    #[error("marker {marker:?} not observed after {attempts} attempt(s) in {elapsed:?}")]
    Exhausted {
        marker: String,
        attempts: u32,
        elapsed: Duration,
    },

    /// The retry policy cannot be polled with (zero interval or zero attempts)
    #[error("invalid retry policy: {0}")]
    InvalidPolicy(String),

    /// The log source failed; no retry is attempted
    #[error(transparent)]
    Fetch(#[from] anyhow::Error),
}

/// Polls a log source until a marker shows up
pub struct CompletionPoller {
    marker: Marker,
    components: Vec<String>,
    policy: RetryPolicy,
    state: PollState,
    attempts: u32,
}

impl CompletionPoller {
    /// Creates a poller watching the "flow" component
    pub fn new(marker: Marker, policy: RetryPolicy) -> Self {
        Self {
            marker,
            components: vec![FLOW_COMPONENT.to_string()],
            policy,
            state: PollState::Polling,
            attempts: 0,
        }
    }

    /// Replaces the watched components
    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Number of fetches made by the current or last run
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Polls `source` until the marker appears
    ///
    /// The policy is validated before the first fetch. After that at least
    /// one fetch is always made. Between fetches the task sleeps for the
    /// policy interval; nothing else happens while it waits.
    pub async fn run<S>(&mut self, source: &S) -> Result<PollOutcome, PollError>
    where
        S: LogSource + ?Sized,
    {
        self.state = PollState::Polling;
        self.attempts = 0;

        self.policy
            .validate()
            .map_err(|e| PollError::InvalidPolicy(e.to_string()))?;

        info!(
            "Waiting for {:?} in {:?} (interval: {:?})",
            self.marker.as_str(),
            self.components,
            self.policy.interval
        );

        let started = Instant::now();

        loop {
            self.attempts += 1;

            let lines = source.fetch_logs(&self.components).await?;
            debug!(
                "Attempt {}: fetched {} log line(s)",
                self.attempts,
                lines.len()
            );

            if let Some(line) = lines.into_iter().find(|line| self.marker.matches(line)) {
                self.state = PollState::Done;
                let elapsed = started.elapsed();

                info!(
                    "Observed {:?} after {} attempt(s) in {:?}",
                    self.marker.as_str(),
                    self.attempts,
                    elapsed
                );

                return Ok(PollOutcome {
                    attempts: self.attempts,
                    matched_line: line,
                    elapsed,
                });
            }

            let elapsed = started.elapsed();
            if !self.policy.allows_retry(self.attempts, elapsed) {
                warn!(
                    "Giving up on {:?} after {} attempt(s) in {:?}",
                    self.marker.as_str(),
                    self.attempts,
                    elapsed
                );

                return Err(PollError::Exhausted {
                    marker: self.marker.to_string(),
                    attempts: self.attempts,
                    elapsed,
                });
            }

            time::sleep(self.policy.interval).await;
        }
    }
}

/// Waits for `marker` in the logs of `components`
pub async fn wait_for_marker<S>(
    source: &S,
    components: &[String],
    marker: &Marker,
    policy: RetryPolicy,
) -> Result<PollOutcome, PollError>
where
    S: LogSource + ?Sized,
{
    CompletionPoller::new(marker.clone(), policy)
        .with_components(components.iter().cloned())
        .run(source)
        .await
}
