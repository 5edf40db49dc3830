//! Configuration module
//!
//! Global CLI settings shared by every command.

use appwatch_client::CloudClient;
use appwatch_harness::HarnessConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the cloud control plane
    pub cloud_url: String,

    /// Bearer token for the control plane
    pub token: Option<String>,
}

impl Config {
    /// Builds a control plane client
    pub fn client(&self) -> CloudClient {
        self.harness().client()
    }

    /// Harness configuration seeded with the global settings
    pub fn harness(&self) -> HarnessConfig {
        HarnessConfig {
            api_token: self.token.clone(),
            ..HarnessConfig::new(self.cloud_url.clone())
        }
    }
}
