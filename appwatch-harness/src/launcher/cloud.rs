//! Cloud launcher
//!
//! Runs app bundles through the cloud control plane:
//! - Launching the bundle and waiting until the app reports `Running`
//! - Serving the app's logs to the completion poller
//! - Stopping and deleting the app on teardown
//! - Deleting half-started apps when startup fails

use anyhow::Result;
use appwatch_client::{ClientError, CloudClient};
use appwatch_core::domain::app::{App, AppStatus};
use appwatch_core::dto::app::LaunchApp;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::HarnessConfig;
use crate::launcher::{AppHandle, AppLauncher};
use crate::scheduler::retry::RetryPolicy;
use crate::source::LogSource;

/// Errors raised while bringing an app up in the cloud
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("bundle path {} has no usable directory name", .0.display())]
    InvalidBundle(PathBuf),

    #[error("app {name} ({id}) entered {status:?} while starting")]
    StartupFailed {
        id: Uuid,
        name: String,
        status: AppStatus,
    },

    #[error("app {name} ({id}) was not running after {waited:?}")]
    StartupTimeout {
        id: Uuid,
        name: String,
        waited: Duration,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Launcher backed by the cloud control plane
pub struct CloudLauncher {
    client: Arc<CloudClient>,
    poll_interval: Duration,
    startup_timeout: Duration,
    env: HashMap<String, String>,
}

impl CloudLauncher {
    pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(300);

    /// Creates a launcher with a one second status interval and a five minute startup timeout
    pub fn new(client: CloudClient) -> Self {
        Self {
            client: Arc::new(client),
            poll_interval: RetryPolicy::DEFAULT_INTERVAL,
            startup_timeout: Self::DEFAULT_STARTUP_TIMEOUT,
            env: HashMap::new(),
        }
    }

    /// Creates a launcher from harness configuration
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.client())
            .with_poll_interval(config.poll_interval)
            .with_startup_timeout(config.startup_timeout)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    /// Adds an environment variable passed to every launched app
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn client(&self) -> &CloudClient {
        &self.client
    }

    /// Polls the app status until it is running
    async fn wait_until_running(&self, mut app: App) -> std::result::Result<App, LaunchError> {
        let policy =
            RetryPolicy::unbounded(self.poll_interval).with_max_elapsed(self.startup_timeout);
        let started = Instant::now();
        let mut attempts = 0;

        loop {
            match app.status {
                AppStatus::Running => return Ok(app),
                status if status.is_terminal() => {
                    return Err(LaunchError::StartupFailed {
                        id: app.id,
                        name: app.name,
                        status,
                    });
                }
                status => debug!("App {} is {:?}, waiting", app.id, status),
            }

            attempts += 1;
            if !policy.allows_retry(attempts, started.elapsed()) {
                return Err(LaunchError::StartupTimeout {
                    id: app.id,
                    name: app.name,
                    waited: started.elapsed(),
                });
            }

            time::sleep(policy.interval).await;
            app = self.client.get_app(app.id).await?;
        }
    }
}

/// Stops then deletes an app; an app that is already gone counts as released
async fn release_app(client: &CloudClient, app_id: Uuid) -> std::result::Result<(), ClientError> {
    if let Err(e) = client.stop_app(app_id).await {
        if e.is_not_found() {
            debug!("App {} already gone", app_id);
            return Ok(());
        }
        // A failed or already stopped app may refuse to stop; deleting still applies
        debug!("Stop request for app {} failed: {}", app_id, e);
    }

    match client.delete_app(app_id).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl AppLauncher for CloudLauncher {
    async fn launch(&self, bundle: &Path) -> Result<AppHandle> {
        let name = bundle
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| LaunchError::InvalidBundle(bundle.to_path_buf()))?;

        info!("Launching {} from {}", name, bundle.display());

        let app = self
            .client
            .launch_app(LaunchApp {
                name: name.to_string(),
                source: bundle.display().to_string(),
                env: self.env.clone(),
            })
            .await
            .map_err(LaunchError::from)?;

        let app_id = app.id;
        match self.wait_until_running(app).await {
            Ok(app) => {
                info!("App {} ({}) reached Running", app.name, app.id);
                let logs = Arc::new(CloudLogSource::new(Arc::clone(&self.client), app.id));
                Ok(AppHandle::new(app.id, app.name, app.url, logs))
            }
            Err(e) => {
                warn!("App {} failed to start: {}", app_id, e);
                if let Err(release_err) = release_app(&self.client, app_id).await {
                    warn!("Failed to release app {}: {}", app_id, release_err);
                }
                Err(e.into())
            }
        }
    }

    async fn teardown(&self, app: &AppHandle) -> Result<()> {
        release_app(&self.client, app.id()).await?;
        info!("App {} ({}) released", app.name(), app.id());
        Ok(())
    }

    fn spawn_teardown(&self, app: AppHandle) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(
                "No runtime to release app {} ({}); delete it manually",
                app.name(),
                app.id()
            );
            return;
        };

        let client = Arc::clone(&self.client);
        runtime.spawn(async move {
            match release_app(&client, app.id()).await {
                Ok(()) => info!("App {} ({}) released in background", app.name(), app.id()),
                Err(e) => warn!("Failed to release app {} in background: {}", app.id(), e),
            }
        });
    }
}

/// Log source reading an app's logs from the control plane
pub struct CloudLogSource {
    client: Arc<CloudClient>,
    app_id: Uuid,
}

impl CloudLogSource {
    pub fn new(client: Arc<CloudClient>, app_id: Uuid) -> Self {
        Self { client, app_id }
    }
}

#[async_trait]
impl LogSource for CloudLogSource {
    async fn fetch_logs(&self, components: &[String]) -> Result<Vec<String>> {
        let entries = self.client.fetch_logs(self.app_id, components).await?;

        Ok(entries.into_iter().map(|entry| entry.message).collect())
    }
}

/// Launches `bundle` in the cloud described by `config`, runs `body`, then
/// releases the app
///
/// # Example
/// ```no_run
/// # use appwatch_harness::{HarnessConfig, CompletionPoller, run_app_in_cloud};
/// # use appwatch_core::domain::marker::Marker;
/// # async fn example() -> anyhow::Result<()> {
/// let config = HarnessConfig::from_env()?;
/// let policy = config.retry_policy();
/// run_app_in_cloud(&config, "examples/app_payload", |app| async move {
///     CompletionPoller::new(Marker::application_end(), policy)
///         .run(&app)
///         .await?;
///     Ok::<_, anyhow::Error>(())
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_app_in_cloud<P, F, Fut, T>(
    config: &HarnessConfig,
    bundle: P,
    body: F,
) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(AppHandle) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let launcher = CloudLauncher::from_config(config);
    crate::launcher::with_app(&launcher, bundle.as_ref(), body).await
}
