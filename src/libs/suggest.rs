//! AI-assisted task creation.
//!
//! Turns a raw free-text idea into a structured task draft by asking the
//! model for a JSON object and shape-checking the reply. One attempt, no
//! retry; a usable reply either deserializes into [`TaskSuggestion`] or the
//! call fails with a malformed-output error.

use crate::api::openai::{CompletionBackend, CompletionRequest};
use crate::libs::error::ApiError;
use crate::libs::task::Priority;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

const TEMPERATURE: f32 = 0.7;

/// The structured draft the model must produce. Deserialization is the
/// shape check: priority must be one of the four enum values, the time
/// estimate must be a number, and `dueDate` must be present (null is fine).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSuggestion {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub time_estimate: serde_json::Number,
    #[serde(deserialize_with = "required_nullable")]
    pub due_date: Option<String>,
}

/// Makes a nullable field required: an explicit `null` passes, a missing
/// key does not.
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// System prompt instructing the model to emit a task draft as bare JSON.
/// The example due date is anchored a day out from `now` so the model
/// grounds relative phrases like "by tomorrow".
pub fn build_prompt(now: DateTime<Utc>) -> String {
    let example_due = (now + Duration::days(1)).to_rfc3339_opts(SecondsFormat::Millis, true);
    format!(
        r#"You are a highly intelligent and helpful AI assistant specialized in task management. Your goal is to take a user's raw task idea and transform it into a well-defined task with a clear title, detailed description, appropriate priority, a reasonable time estimate, and a suggested due date.

Respond ONLY with a JSON object. Do not include any other text or markdown outside the JSON.

The JSON object should have the following structure:
{{
  "title": "string", // A concise, improved title for the task. Correct spelling and grammar.
  "description": "string", // A detailed and actionable description for the task.
  "priority": "LOW" | "MEDIUM" | "HIGH" | "URGENT", // The estimated priority of the task.
  "timeEstimate": "number", // The estimated time to complete the task in minutes (integer).
  "dueDate": "string" // The suggested due date and time in ISO 8601 format. Default to null if not specified.
}}

Example:
User input: "fix bug in login by tomorrow"
Response:
{{
  "title": "Fix Login Bug",
  "description": "Investigate and resolve the bug affecting the user login functionality. This includes identifying the root cause, implementing a fix, testing thoroughly, and deploying the solution.",
  "priority": "HIGH",
  "timeEstimate": 120,
  "dueDate": "{example_due}"
}}"#
    )
}

/// Asks the model to draft a task from the user's idea.
pub async fn suggest(
    backend: &dyn CompletionBackend,
    user_input: &str,
) -> Result<TaskSuggestion, ApiError> {
    let request = CompletionRequest {
        system: build_prompt(Utc::now()),
        user: format!("User input: {}", user_input),
        temperature: TEMPERATURE,
        json_response: true,
    };
    let reply = backend.complete(request).await?;

    serde_json::from_str(&reply).map_err(|err| {
        ApiError::MalformedOutput(format!("suggestion did not match the expected shape: {err}"))
    })
}
