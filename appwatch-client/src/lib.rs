//! Appwatch HTTP Client
//!
//! A small, typed HTTP client for the cloud control plane that runs apps and
//! serves their logs.
//!
//! # Example
//!
//! ```no_run
//! use appwatch_client::CloudClient;
//! use appwatch_core::dto::app::LaunchApp;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CloudClient::new("http://localhost:8080");
//!
//!     let app = client.launch_app(LaunchApp {
//!         name: "app_payload".to_string(),
//!         source: "examples/app_payload".to_string(),
//!         env: Default::default(),
//!     }).await?;
//!
//!     println!("Launched app: {}", app.id);
//!     Ok(())
//! }
//! ```

mod apps;
pub mod error;
mod logs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// HTTP client for the cloud control plane API
///
/// Methods are grouped by concern:
/// - App lifecycle (launch, get, list, stop, delete)
/// - Log retrieval per component
#[derive(Debug, Clone)]
pub struct CloudClient {
    /// Base URL of the control plane (e.g., "http://localhost:8080")
    base_url: String,
    /// Bearer token attached to every request, if any
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl CloudClient {
    /// Create a new cloud client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the control plane API (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use appwatch_client::CloudClient;
    ///
    /// let client = CloudClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new cloud client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use appwatch_client::CloudClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = CloudClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        }
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL of the control plane
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request against `path` (relative to the base URL) with auth applied
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an error if the request failed,
    /// otherwise deserializes the response body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CloudClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert!(client.token.is_none());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = CloudClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_token() {
        let client = CloudClient::new("http://localhost:8080").with_token("secret");
        assert_eq!(client.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_request_joins_path() {
        let client = CloudClient::new("http://localhost:8080/");
        let request = client.request(Method::GET, "/api/apps").build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/apps");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_request_sets_bearer_auth() {
        let client = CloudClient::new("http://localhost:8080").with_token("secret");
        let request = client.request(Method::GET, "/api/apps").build().unwrap();
        let auth = request.headers().get("authorization").unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer secret");
    }
}
