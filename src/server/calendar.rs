//! Calendar endpoint.

use super::AppState;
use crate::libs::calendar::{self, CalendarEvent};
use crate::libs::error::ApiError;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// `GET /events`: every task as a point-in-time calendar event.
pub async fn events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    let tasks = state.tasks.lock().fetch_all()?;
    Ok(Json(calendar::project(&tasks)))
}
