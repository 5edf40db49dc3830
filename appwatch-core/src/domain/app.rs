//! App domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An application instance running in the cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub id: Uuid,
    pub name: String,
    pub status: AppStatus,
    /// Public URL of the running app, once the control plane assigns one
    pub url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Lifecycle status of a cloud app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppStatus {
    Pending,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl AppStatus {
    /// Returns true if the app can no longer change state on its own
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppStatus::Stopped | AppStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(AppStatus::Stopped.is_terminal());
        assert!(AppStatus::Failed.is_terminal());
        assert!(!AppStatus::Pending.is_terminal());
        assert!(!AppStatus::Running.is_terminal());
        assert!(!AppStatus::Stopping.is_terminal());
    }

    #[test]
    fn test_app_deserializes_without_url() {
        let json = serde_json::json!({
            "id": "8f14e45f-ceea-467f-a0b6-3c2d2b7f7c2e",
            "name": "app_payload",
            "status": "Pending",
            "url": null,
            "created_at": "2024-01-01T12:00:00Z"
        });

        let app: App = serde_json::from_value(json).unwrap();
        assert_eq!(app.name, "app_payload");
        assert_eq!(app.status, AppStatus::Pending);
        assert!(app.url.is_none());
    }
}
