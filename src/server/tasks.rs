//! Task CRUD handlers.
//!
//! Every write also appends an event-log line after the database commit;
//! the append is best-effort and never fails the request.

use super::AppState;
use crate::libs::error::ApiError;
use crate::libs::event_log::EventKind;
use crate::libs::task::{Task, TaskDraft, TaskPatch};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

fn not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

fn details(task: &Task) -> Value {
    serde_json::to_value(task).unwrap_or(Value::Null)
}

/// `POST /tasks`
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = Task::from_draft(draft, Utc::now())?;
    state.tasks.lock().insert(&task)?;
    state.log.record(EventKind::TaskCreated, &task.id, details(&task));
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /tasks`, newest first.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.tasks.lock().fetch_all()?;
    Ok(Json(tasks))
}

/// `GET /tasks/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.lock().get_by_id(&id)?.ok_or_else(not_found)?;
    Ok(Json(task))
}

/// `PATCH /tasks/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    let now = Utc::now();
    let (task, completed) = {
        let tasks = state.tasks.lock();
        let mut task = tasks.get_by_id(&id)?.ok_or_else(not_found)?;
        let completed = task.apply(patch, now)?;
        tasks.update(&task)?;
        (task, completed)
    };

    let kind = if completed {
        EventKind::TaskCompleted
    } else {
        EventKind::TaskUpdated
    };
    state.log.record(kind, &task.id, details(&task));
    Ok(Json(task))
}

/// `DELETE /tasks/{id}`
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let task = {
        let tasks = state.tasks.lock();
        let task = tasks.get_by_id(&id)?.ok_or_else(not_found)?;
        tasks.delete(&id)?;
        task
    };
    state.log.record(EventKind::TaskDeleted, &task.id, details(&task));
    Ok(Json(json!({ "deleted": task.id })))
}
