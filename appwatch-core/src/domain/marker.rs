//! Completion markers
//!
//! A marker is a literal substring whose appearance in an app's output
//! signals a lifecycle milestone.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker printed by sample apps once they have shut down cleanly
pub const APPLICATION_END: &str = "Application End!";

/// Component that carries the top-level flow output of an app
pub const FLOW_COMPONENT: &str = "flow";

/// A literal substring searched for in log lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Marker(String);

/// Returned when building a marker from an empty string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyMarker;

impl fmt::Display for EmptyMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker cannot be empty")
    }
}

impl std::error::Error for EmptyMarker {}

impl Marker {
    /// Creates a marker, rejecting the empty string (it would match every line)
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyMarker> {
        let text = text.into();
        if text.is_empty() {
            return Err(EmptyMarker);
        }
        Ok(Self(text))
    }

    /// The "Application End!" marker
    pub fn application_end() -> Self {
        Self(APPLICATION_END.to_string())
    }

    /// Returns true if the line contains the marker anywhere
    pub fn matches(&self, line: &str) -> bool {
        line.contains(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::application_end()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Marker {
    type Error = EmptyMarker;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Marker> for String {
    fn from(marker: Marker) -> Self {
        marker.0
    }
}
