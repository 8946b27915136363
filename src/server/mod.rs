//! HTTP server: shared state, router, and startup.
//!
//! Handlers live in one module per concern, mirroring the API surface:
//! task CRUD, the calendar projection, log reading/analysis, and the AI
//! endpoints. All of them share [`AppState`]; every dependency in it is
//! constructed from explicit paths/config so tests can assemble the same
//! router around temp files and a scripted model backend.

pub mod ai;
pub mod calendar;
pub mod logs;
pub mod tasks;

use crate::api::openai::{CompletionBackend, OpenAi};
use crate::db::tasks::Tasks;
use crate::libs::config::Config;
use crate::libs::error::ApiError;
use crate::libs::event_log::EventLog;
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct AppState {
    /// SQLite store behind a mutex; queries are short and handlers never
    /// hold the guard across an await point.
    pub tasks: Mutex<Tasks>,
    pub log: EventLog,
    backend: Option<Arc<dyn CompletionBackend>>,
}

impl AppState {
    pub fn new(tasks: Tasks, log: EventLog, backend: Option<Arc<dyn CompletionBackend>>) -> Self {
        AppState {
            tasks: Mutex::new(tasks),
            log,
            backend,
        }
    }

    /// The model backend, or the upstream error every AI endpoint returns
    /// when the service was started without an API key.
    pub fn backend(&self) -> Result<&dyn CompletionBackend, ApiError> {
        self.backend
            .as_deref()
            .ok_or_else(|| ApiError::upstream("OPENAI_API_KEY is not set"))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Task CRUD.
        .route("/tasks", post(tasks::create).get(tasks::list))
        .route(
            "/tasks/{id}",
            get(tasks::get).patch(tasks::update).delete(tasks::remove),
        )
        // Calendar projection.
        .route("/events", get(calendar::events))
        // Event log.
        .route("/raw-logs", get(logs::raw))
        .route("/analyze-logs", get(logs::analyze))
        // AI endpoints.
        .route("/suggest-task", post(ai::suggest))
        .route("/chat-query", post(ai::chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Builds the full application from config and serves it until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let tasks = Tasks::new(&config.db_path)?;
    let log = EventLog::new(&config.log_path);
    let backend: Option<Arc<dyn CompletionBackend>> = match &config.openai {
        Some(openai) => Some(Arc::new(OpenAi::new(openai))),
        None => {
            tracing::warn!("OPENAI_API_KEY is not set; AI endpoints will fail until it is provided");
            None
        }
    };

    let state = Arc::new(AppState::new(tasks, log, backend));
    let app = router(state);

    let addr = config.addr();
    tracing::info!(
        db = %config.db_path.display(),
        log = %config.log_path.display(),
        "taskdeck listening on {addr}"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
