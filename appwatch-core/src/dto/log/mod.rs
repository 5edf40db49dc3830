//! Log DTOs

use serde::{Deserialize, Serialize};

/// Query parameters for fetching app logs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogQuery {
    /// Comma-separated component names; empty means all components
    #[serde(default)]
    pub components: String,
}

impl LogQuery {
    pub fn for_components(components: &[String]) -> Self {
        Self {
            components: components.join(","),
        }
    }

    /// Splits the component list back into names, skipping blanks
    pub fn component_names(&self) -> Vec<&str> {
        self.components
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}
