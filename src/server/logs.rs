//! Event-log endpoints: raw read-back and the AI report.

use super::AppState;
use crate::libs::error::ApiError;
use crate::libs::report;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// `GET /raw-logs`: every parseable log line, `[]` when the log is
/// missing or empty.
pub async fn raw(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>, ApiError> {
    let entries = state.log.read_entries()?;
    Ok(Json(entries))
}

/// `GET /analyze-logs`: AI productivity report over the whole log.
///
/// An absent or empty log short-circuits to an informational string in
/// place of the report object; the model is not called.
pub async fn analyze(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let content = match state.log.read_raw()? {
        None => return Ok(Json(json!({ "report": report::NO_DATA_MISSING }))),
        Some(content) => content,
    };
    if content.trim().is_empty() {
        return Ok(Json(json!({ "report": report::NO_DATA_EMPTY })));
    }

    let backend = state.backend()?;
    let report = report::analyze(backend, &content).await?;
    Ok(Json(json!({ "report": report })))
}
