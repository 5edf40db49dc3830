//! Harness configuration
//!
//! Defines where the cloud control plane lives and how long the harness
//! waits for apps to start and to finish.

use appwatch_client::CloudClient;
use appwatch_core::domain::marker::{FLOW_COMPONENT, Marker};
use std::time::Duration;

use crate::launcher::cloud::CloudLauncher;
use crate::scheduler::poller::CompletionPoller;
use crate::scheduler::retry::RetryPolicy;

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Control plane base URL (e.g., "http://localhost:8080")
    pub cloud_url: String,

    /// Bearer token for the control plane
    pub api_token: Option<String>,

    /// How often to fetch logs and app status
    pub poll_interval: Duration,

    /// Upper bound on waiting for a marker; `None` waits forever
    pub max_wait: Option<Duration>,

    /// Upper bound on log fetches per marker; `None` means no count limit
    pub max_attempts: Option<u32>,

    /// Upper bound on waiting for a launched app to reach `Running`
    pub startup_timeout: Duration,

    /// Components whose logs are searched for markers
    pub components: Vec<String>,
}

impl HarnessConfig {
    /// Creates a new configuration with defaults
    pub fn new(cloud_url: String) -> Self {
        Self {
            cloud_url,
            api_token: None,
            poll_interval: RetryPolicy::DEFAULT_INTERVAL,
            max_wait: Some(RetryPolicy::DEFAULT_MAX_ELAPSED),
            max_attempts: None,
            startup_timeout: CloudLauncher::DEFAULT_STARTUP_TIMEOUT,
            components: vec![FLOW_COMPONENT.to_string()],
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - APPWATCH_CLOUD_URL (required)
    /// - APPWATCH_API_TOKEN (optional)
    /// - APPWATCH_POLL_INTERVAL (optional, seconds, default: 1)
    /// - APPWATCH_MAX_WAIT (optional, seconds, default: 900, 0 = no limit)
    /// - APPWATCH_MAX_ATTEMPTS (optional, default: no limit)
    /// - APPWATCH_STARTUP_TIMEOUT (optional, seconds, default: 300)
    /// - APPWATCH_COMPONENTS (optional, comma-separated, default: flow)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let cloud_url = lookup("APPWATCH_CLOUD_URL")
            .ok_or_else(|| anyhow::anyhow!("APPWATCH_CLOUD_URL environment variable not set"))?;

        let mut config = Self::new(cloud_url);

        config.api_token = lookup("APPWATCH_API_TOKEN").filter(|token| !token.is_empty());

        if let Some(secs) = parse_secs(&lookup, "APPWATCH_POLL_INTERVAL")? {
            config.poll_interval = Duration::from_secs(secs);
        }

        if let Some(secs) = parse_secs(&lookup, "APPWATCH_MAX_WAIT")? {
            config.max_wait = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(value) = lookup("APPWATCH_MAX_ATTEMPTS") {
            let attempts = value.trim().parse::<u32>().map_err(|_| {
                anyhow::anyhow!("APPWATCH_MAX_ATTEMPTS must be a whole number, got {:?}", value)
            })?;
            config.max_attempts = Some(attempts);
        }

        if let Some(secs) = parse_secs(&lookup, "APPWATCH_STARTUP_TIMEOUT")? {
            config.startup_timeout = Duration::from_secs(secs);
        }

        if let Some(components) = lookup("APPWATCH_COMPONENTS") {
            config.components = components
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(config)
    }

    /// Retry policy used while waiting for markers
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::unbounded(self.poll_interval);
        if let Some(max_wait) = self.max_wait {
            policy = policy.with_max_elapsed(max_wait);
        }
        if let Some(max_attempts) = self.max_attempts {
            policy = policy.with_max_attempts(max_attempts);
        }
        policy
    }

    /// Completion poller for `marker` over the configured components and wait bounds
    pub fn poller(&self, marker: Marker) -> CompletionPoller {
        CompletionPoller::new(marker, self.retry_policy()).with_components(self.components.clone())
    }

    /// Builds a control plane client with the configured token
    pub fn client(&self) -> CloudClient {
        let client = CloudClient::new(self.cloud_url.clone());
        match &self.api_token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cloud_url.is_empty() {
            anyhow::bail!("cloud_url cannot be empty");
        }

        if !self.cloud_url.starts_with("http://") && !self.cloud_url.starts_with("https://") {
            anyhow::bail!("cloud_url must start with http:// or https://");
        }

        if self.startup_timeout.is_zero() {
            anyhow::bail!("startup_timeout must be greater than 0");
        }

        if self.components.is_empty() {
            anyhow::bail!("at least one log component is required");
        }

        self.retry_policy().validate()
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080".to_string())
    }
}

/// Reads an optional whole number of seconds
fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> anyhow::Result<Option<u64>> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };

    value.trim().parse::<u64>().map(Some).map_err(|_| {
        anyhow::anyhow!("{} must be a whole number of seconds, got {:?}", key, value)
    })
}
