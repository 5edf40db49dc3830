//! Log sources
//!
//! A log source returns the current log lines of a running app for a set of
//! component names. Each call reflects only the logs available at call time.

use anyhow::Result;
use async_trait::async_trait;

/// Anything the completion poller can fetch log lines from
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Fetches the current ordered log lines of the given components
    async fn fetch_logs(&self, components: &[String]) -> Result<Vec<String>>;
}
