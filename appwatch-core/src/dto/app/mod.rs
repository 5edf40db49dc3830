//! App DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request to launch an app bundle in the cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchApp {
    /// Display name of the app
    pub name: String,
    /// Location of the app bundle, as understood by the control plane
    pub source: String,
    /// Environment variables injected into the app
    #[serde(default)]
    pub env: HashMap<String, String>,
}
