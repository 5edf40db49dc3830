//! App lifecycle endpoints

use crate::CloudClient;
use crate::error::Result;
use appwatch_core::domain::app::App;
use appwatch_core::dto::app::LaunchApp;
use reqwest::Method;
use uuid::Uuid;

impl CloudClient {
    /// Launch an app bundle
    ///
    /// The returned app is usually still `Pending`; poll [`CloudClient::get_app`]
    /// until it reports `Running`.
    ///
    /// # Example
    /// ```no_run
    /// # use appwatch_client::CloudClient;
    /// # use appwatch_core::dto::app::LaunchApp;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = CloudClient::new("http://localhost:8080");
    /// let app = client.launch_app(LaunchApp {
    ///     name: "app_payload".to_string(),
    ///     source: "examples/app_payload".to_string(),
    ///     env: Default::default(),
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn launch_app(&self, req: LaunchApp) -> Result<App> {
        tracing::debug!("Launching app {} from {}", req.name, req.source);

        let response = self
            .request(Method::POST, "/api/apps")
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get an app by ID
    pub async fn get_app(&self, app_id: Uuid) -> Result<App> {
        let response = self
            .request(Method::GET, &format!("/api/apps/{}", app_id))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List all apps known to the control plane
    pub async fn list_apps(&self) -> Result<Vec<App>> {
        let response = self.request(Method::GET, "/api/apps").send().await?;

        self.handle_response(response).await
    }

    /// Ask the control plane to stop a running app
    pub async fn stop_app(&self, app_id: Uuid) -> Result<()> {
        let response = self
            .request(Method::POST, &format!("/api/apps/{}/stop", app_id))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Delete an app and release its cloud resources
    pub async fn delete_app(&self, app_id: Uuid) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/api/apps/{}", app_id))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
