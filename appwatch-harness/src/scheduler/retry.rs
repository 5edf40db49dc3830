//! Retry policy
//!
//! Fixed-interval retry with optional attempt and elapsed-time bounds.

use std::time::Duration;

/// Fixed-interval retry policy
///
/// No backoff: every retry waits exactly `interval`. Leaving both bounds
/// unset gives an unbounded policy, which only ends when the caller stops
/// polling (e.g. an outer `tokio::time::timeout`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between two attempts
    pub interval: Duration,

    /// Maximum number of attempts, including the first one
    pub max_attempts: Option<u32>,

    /// Maximum time spent between the first attempt and the start of the last one
    pub max_elapsed: Option<Duration>,
}

impl RetryPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_ELAPSED: Duration = Duration::from_secs(15 * 60);

    /// Creates a policy with the given interval and the default elapsed bound
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            max_elapsed: Some(Self::DEFAULT_MAX_ELAPSED),
        }
    }

    /// Creates a policy that retries forever
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            max_elapsed: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = Some(max_elapsed);
        self
    }

    /// Returns true if another attempt may start after `attempts` attempts
    /// have been made and `elapsed` time has passed since the first one.
    ///
    /// The next attempt would start one interval from now, so the elapsed
    /// bound is checked against `elapsed + interval`.
    pub fn allows_retry(&self, attempts: u32, elapsed: Duration) -> bool {
        if let Some(max_attempts) = self.max_attempts {
            if attempts >= max_attempts {
                return false;
            }
        }

        if let Some(max_elapsed) = self.max_elapsed {
            if elapsed.saturating_add(self.interval) > max_elapsed {
                return false;
            }
        }

        true
    }

    /// Returns true if neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.max_elapsed.is_none()
    }

    /// Validates the policy
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval.is_zero() {
            anyhow::bail!("poll interval must be greater than 0");
        }

        if self.max_attempts == Some(0) {
            anyhow::bail!("max_attempts must be greater than 0");
        }

        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
