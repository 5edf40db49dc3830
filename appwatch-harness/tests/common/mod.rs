//! In-process fake of the cloud control plane
//!
//! Serves the same HTTP API as the real control plane from an axum router
//! bound to a random local port. Apps start `Pending`, turn `Running` after a
//! configurable number of status checks, and reveal scripted log batches one
//! fetch at a time.

#![allow(dead_code)]

use appwatch_core::domain::app::{App, AppStatus};
use appwatch_core::domain::log::{LogEntry, LogLevel};
use appwatch_core::dto::app::LaunchApp;
use appwatch_core::dto::log::LogQuery;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

type Shared = Arc<Mutex<CloudState>>;
type ApiResult<T> = Result<T, (StatusCode, String)>;

#[derive(Default)]
struct CloudState {
    apps: HashMap<Uuid, FakeApp>,
    /// Status checks an app answers with `Pending` before it settles
    startup_checks: u32,
    /// Settle into `Failed` instead of `Running`
    fail_startup: bool,
    /// Log batches handed to the next launched app
    log_script: Vec<Vec<LogEntry>>,
    required_token: Option<String>,
    requests: Vec<String>,
}

struct FakeApp {
    app: App,
    launch: LaunchApp,
    pending_checks: u32,
    settles_as: AppStatus,
    logs: Vec<LogEntry>,
    log_script: VecDeque<Vec<LogEntry>>,
    fetches: u32,
}

/// Running fake control plane; the server stops when this is dropped
pub struct FakeCloud {
    pub base_url: String,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeCloud {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state: Shared = Arc::new(Mutex::new(CloudState::default()));
        let router = Router::new()
            .route("/api/apps", post(launch_app).get(list_apps))
            .route("/api/apps/{id}", get(get_app).delete(delete_app))
            .route("/api/apps/{id}/stop", post(stop_app))
            .route("/api/apps/{id}/logs", get(fetch_logs))
            .with_state(Arc::clone(&state));

        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            server,
        }
    }

    /// Apps launched from now on need `checks` status polls before settling
    pub fn set_startup(&self, checks: u32, fail: bool) {
        let mut state = self.state.lock().unwrap();
        state.startup_checks = checks;
        state.fail_startup = fail;
    }

    /// Log batches revealed one per fetch to apps launched from now on
    pub fn script_logs(&self, batches: Vec<Vec<LogEntry>>) {
        self.state.lock().unwrap().log_script = batches;
    }

    pub fn require_token(&self, token: &str) {
        self.state.lock().unwrap().required_token = Some(token.to_string());
    }

    /// "METHOD /path" of every request served so far
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn app_count(&self) -> usize {
        self.state.lock().unwrap().apps.len()
    }

    pub fn launched_source(&self, id: Uuid) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.apps.get(&id).map(|app| app.launch.source.clone())
    }

    pub fn log_fetches(&self, id: Uuid) -> Option<u32> {
        let state = self.state.lock().unwrap();
        state.apps.get(&id).map(|app| app.fetches)
    }
}

impl Drop for FakeCloud {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Builds a log entry for `component`
pub fn entry(component: &str, message: &str) -> LogEntry {
    LogEntry {
        timestamp: chrono::Utc::now(),
        component: component.to_string(),
        level: LogLevel::Info,
        message: message.to_string(),
    }
}

/// Installs a test-friendly tracing subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Handlers
// =============================================================================

fn authorize(state: &mut CloudState, headers: &HeaderMap, request: String) -> ApiResult<()> {
    state.requests.push(request);

    let Some(token) = &state.required_token else {
        return Ok(());
    };

    let expected = format!("Bearer {}", token);
    let provided = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if provided == Some(expected.as_str()) {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "missing or invalid token".to_string()))
    }
}

fn not_found(id: Uuid) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("app {} not found", id))
}

async fn launch_app(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<LaunchApp>,
) -> ApiResult<Json<App>> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, "POST /api/apps".to_string())?;

    let app = App {
        id: Uuid::new_v4(),
        name: req.name.clone(),
        status: AppStatus::Pending,
        url: None,
        created_at: chrono::Utc::now(),
    };

    let fake = FakeApp {
        app: app.clone(),
        launch: req,
        pending_checks: state.startup_checks,
        settles_as: if state.fail_startup {
            AppStatus::Failed
        } else {
            AppStatus::Running
        },
        logs: Vec::new(),
        log_script: state.log_script.iter().cloned().collect(),
        fetches: 0,
    };
    state.apps.insert(app.id, fake);

    Ok(Json(app))
}

async fn list_apps(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Json<Vec<App>>> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, "GET /api/apps".to_string())?;

    Ok(Json(state.apps.values().map(|fake| fake.app.clone()).collect()))
}

async fn get_app(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<App>> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, format!("GET /api/apps/{}", id))?;

    let fake = state.apps.get_mut(&id).ok_or_else(|| not_found(id))?;
    if fake.app.status == AppStatus::Pending {
        if fake.pending_checks == 0 {
            fake.app.status = fake.settles_as;
            if fake.app.status == AppStatus::Running {
                fake.app.url = Some(format!("https://{}.apps.example.com", fake.app.name));
            }
        } else {
            fake.pending_checks -= 1;
        }
    }

    Ok(Json(fake.app.clone()))
}

async fn stop_app(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, format!("POST /api/apps/{}/stop", id))?;

    let fake = state.apps.get_mut(&id).ok_or_else(|| not_found(id))?;
    if fake.app.status == AppStatus::Failed {
        return Err((StatusCode::CONFLICT, "app already failed".to_string()));
    }
    fake.app.status = AppStatus::Stopped;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_app(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, format!("DELETE /api/apps/{}", id))?;

    state.apps.remove(&id).ok_or_else(|| not_found(id))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_logs(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(query): Query<LogQuery>,
) -> ApiResult<Json<Vec<LogEntry>>> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, format!("GET /api/apps/{}/logs", id))?;

    let fake = state.apps.get_mut(&id).ok_or_else(|| not_found(id))?;
    fake.fetches += 1;
    if let Some(batch) = fake.log_script.pop_front() {
        fake.logs.extend(batch);
    }

    let components = query.component_names();
    let entries = fake
        .logs
        .iter()
        .filter(|entry| components.is_empty() || components.contains(&entry.component.as_str()))
        .cloned()
        .collect();

    Ok(Json(entries))
}
