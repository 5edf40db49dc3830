//! App launchers
//!
//! A launcher turns an app bundle into a running app and releases it again.
//! [`with_app`] scopes a running app to a block of async logic and always
//! tears it down afterwards, whether the block returns, fails or panics.

pub mod cloud;

use anyhow::Result;
use async_trait::async_trait;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::source::LogSource;

pub use cloud::{CloudLauncher, CloudLogSource, LaunchError};

/// Launches app bundles and releases them
#[async_trait]
pub trait AppLauncher: Send + Sync {
    /// Starts the bundle at `bundle` and returns once it is running
    ///
    /// Implementations release anything they acquired before returning an error.
    async fn launch(&self, bundle: &Path) -> Result<AppHandle>;

    /// Stops the app and frees its resources
    async fn teardown(&self, app: &AppHandle) -> Result<()>;

    /// Releases an app from synchronous code, when a [`with_app`] scope is
    /// dropped before its teardown finished
    ///
    /// Launchers that can release apps in the background override this; the
    /// default only reports the leak.
    fn spawn_teardown(&self, app: AppHandle) {
        warn!(
            "App {} ({}) was not torn down and must be released manually",
            app.name(),
            app.id()
        );
    }
}

/// Hands an app to [`AppLauncher::spawn_teardown`] if dropped while armed
struct TeardownGuard<'a, L: AppLauncher + ?Sized> {
    launcher: &'a L,
    app: Option<AppHandle>,
}

impl<'a, L: AppLauncher + ?Sized> TeardownGuard<'a, L> {
    fn arm(launcher: &'a L, app: AppHandle) -> Self {
        Self {
            launcher,
            app: Some(app),
        }
    }

    fn disarm(&mut self) {
        self.app = None;
    }
}

impl<L: AppLauncher + ?Sized> Drop for TeardownGuard<'_, L> {
    fn drop(&mut self) {
        if let Some(app) = self.app.take() {
            warn!(
                "Scope for app {} ({}) dropped before teardown, releasing in background",
                app.name(),
                app.id()
            );
            self.launcher.spawn_teardown(app);
        }
    }
}

/// Handle to a running app, handed to the body of [`with_app`]
#[derive(Clone)]
pub struct AppHandle {
    id: Uuid,
    name: String,
    url: Option<String>,
    logs: Arc<dyn LogSource>,
}

impl AppHandle {
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        url: Option<String>,
        logs: Arc<dyn LogSource>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            url,
            logs,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Public URL of the app, if the launcher exposes one
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl fmt::Debug for AppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LogSource for AppHandle {
    async fn fetch_logs(&self, components: &[String]) -> Result<Vec<String>> {
        self.logs.fetch_logs(components).await
    }
}

/// Runs `body` against a freshly launched app and tears the app down afterwards
///
/// Teardown happens on every exit path. If `body` panics, the panic resumes
/// once teardown has finished. If `body` fails, its error is returned and a
/// teardown failure is only logged; if `body` succeeds, a teardown failure is
/// returned instead of the value. If the returned future is dropped first
/// (e.g. by an outer `tokio::time::timeout`), the app goes to
/// [`AppLauncher::spawn_teardown`].
pub async fn with_app<L, F, Fut, T>(launcher: &L, bundle: &Path, body: F) -> Result<T>
where
    L: AppLauncher + ?Sized,
    F: FnOnce(AppHandle) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let app = launcher.launch(bundle).await?;
    info!("App {} ({}) is running", app.name(), app.id());
    let mut guard = TeardownGuard::arm(launcher, app.clone());

    let outcome = AssertUnwindSafe(body(app.clone())).catch_unwind().await;

    info!("Tearing down app {} ({})", app.name(), app.id());
    let released = launcher.teardown(&app).await;
    guard.disarm();

    match outcome {
        Ok(Ok(value)) => {
            released?;
            Ok(value)
        }
        Ok(Err(e)) => {
            if let Err(teardown_err) = released {
                warn!("Failed to tear down app {}: {:#}", app.id(), teardown_err);
            }
            Err(e)
        }
        Err(panic) => {
            if let Err(teardown_err) = released {
                warn!("Failed to tear down app {}: {:#}", app.id(), teardown_err);
            }
            std::panic::resume_unwind(panic)
        }
    }
}
