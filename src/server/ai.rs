//! AI endpoints: task suggestion and chat.

use super::AppState;
use crate::libs::chat;
use crate::libs::error::ApiError;
use crate::libs::suggest::{self, TaskSuggestion};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestBody {
    pub user_input: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub question: Option<String>,
}

/// `POST /suggest-task`: free text in, structured task draft out.
///
/// Input validation happens before any model call, so a blank idea costs
/// nothing upstream.
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SuggestBody>,
) -> Result<Json<TaskSuggestion>, ApiError> {
    let input = body
        .user_input
        .filter(|input| !input.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("User input is required".to_string()))?;

    let backend = state.backend()?;
    let suggestion = suggest::suggest(backend, &input).await?;
    Ok(Json(suggestion))
}

/// `POST /chat-query`: answers a question from stored tasks + event log.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> Result<Json<Value>, ApiError> {
    let question = body
        .question
        .filter(|question| !question.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Question is required".to_string()))?;

    let tasks = state.tasks.lock().fetch_all()?;
    let entries = state.log.read_entries()?;

    let backend = state.backend()?;
    let answer = chat::ask(backend, &tasks, &entries, &question).await?;
    Ok(Json(json!({ "answer": answer })))
}
