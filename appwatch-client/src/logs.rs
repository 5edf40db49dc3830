//! Log endpoints

use crate::CloudClient;
use crate::error::Result;
use appwatch_core::domain::log::LogEntry;
use appwatch_core::dto::log::LogQuery;
use reqwest::Method;
use uuid::Uuid;

impl CloudClient {
    /// Fetch the current logs of an app
    ///
    /// # Arguments
    /// * `app_id` - The app UUID
    /// * `components` - Component names to include; empty means all components
    ///
    /// # Returns
    /// Log entries in the order the control plane recorded them. Each call
    /// only reflects logs available at call time.
    pub async fn fetch_logs(&self, app_id: Uuid, components: &[String]) -> Result<Vec<LogEntry>> {
        let response = self
            .request(Method::GET, &format!("/api/apps/{}/logs", app_id))
            .query(&LogQuery::for_components(components))
            .send()
            .await?;

        self.handle_response(response).await
    }
}
