//! AI chat over stored task data.
//!
//! Each question is an independent single-turn exchange: the full task list
//! and event log are embedded into the system prompt as JSON, along with
//! the current time so date questions can be answered. The model is told to
//! answer only from that data, and its free-text reply is returned
//! verbatim. Any conversation history lives client-side.

use crate::api::openai::{CompletionBackend, CompletionRequest};
use crate::libs::error::ApiError;
use crate::libs::task::{Priority, Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

const TEMPERATURE: f32 = 0.5;

/// Task fields exposed to the model. A trimmed projection rather than the
/// full record: enough to answer questions without noise like `updatedAt`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTaskView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub time_estimate: i64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&Task> for ChatTaskView {
    fn from(task: &Task) -> Self {
        ChatTaskView {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            time_estimate: task.time_estimate,
            created_at: task.created_at,
            completed_at: task.completed_at,
        }
    }
}

/// Builds the data-grounded system prompt for one question.
pub fn build_prompt(tasks: &[Task], log_entries: &[Value], now: DateTime<Utc>) -> String {
    let views: Vec<ChatTaskView> = tasks.iter().map(ChatTaskView::from).collect();
    let tasks_json = serde_json::to_string_pretty(&views).unwrap_or_else(|_| "[]".to_string());
    let log_json = serde_json::to_string_pretty(log_entries).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a helpful AI assistant specialized in analyzing user task data.
The user will ask questions about their tasks. You have access to their task list (from a database) and a log of task events (creation and completion).
Answer the user's questions based SOLELY on the provided data. If the data is insufficient to answer a question, state that clearly.
Be concise and direct. Format your answers clearly.

The current date and time is: {now}. Use this information to answer any questions about dates and times.

Here is the user's task data:

--- Tasks (from database) ---
{tasks_json}

--- Task Events Log ---
{log_json}

--- End of Data ---"#,
        now = now.to_rfc3339()
    )
}

/// Answers one question about the supplied task data.
pub async fn ask(
    backend: &dyn CompletionBackend,
    tasks: &[Task],
    log_entries: &[Value],
    question: &str,
) -> Result<String, ApiError> {
    let request = CompletionRequest {
        system: build_prompt(tasks, log_entries, Utc::now()),
        user: question.to_string(),
        temperature: TEMPERATURE,
        json_response: false,
    };
    backend.complete(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::TaskDraft;
    use serde_json::json;

    #[test]
    fn test_prompt_embeds_tasks_and_log() {
        let now: DateTime<Utc> = "2024-06-01T12:00:00Z".parse().unwrap();
        let task = Task::from_draft(
            TaskDraft {
                title: Some("Write quarterly report".to_string()),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        let entries = vec![json!({ "event": "TASK_CREATED", "taskId": task.id })];

        let prompt = build_prompt(&[task.clone()], &entries, now);
        assert!(prompt.contains("Write quarterly report"));
        assert!(prompt.contains("TASK_CREATED"));
        assert!(prompt.contains("2024-06-01"));
        // The trimmed view keeps noise out of the prompt.
        assert!(!prompt.contains("updatedAt"));
    }
}
