//! AI-generated productivity report.
//!
//! Feeds the raw event log (JSONL, as written) to the model with a fixed
//! report-shape prompt and validates the top level of the reply:
//! `summaryText` must be a string, `chartData` an object, and `insights` an
//! array. Nested numeric fields are passed through untouched, so clients
//! keep receiving exactly what the model produced.

use crate::api::openai::{CompletionBackend, CompletionRequest};
use crate::libs::categories;
use crate::libs::error::ApiError;
use serde_json::Value;

const TEMPERATURE: f32 = 0.7;

/// Shown when the log file exists but holds nothing.
pub const NO_DATA_EMPTY: &str =
    "No activity logged yet. Complete some tasks to generate a report.";
/// Shown when no log file has been written at all.
pub const NO_DATA_MISSING: &str =
    "No activity has been logged yet. Complete some tasks first.";

/// System prompt describing the exact report JSON the model must emit.
/// The categorization instructions are rendered from the same keyword
/// table [`categories::categorize`] uses.
pub fn build_prompt() -> String {
    format!(
        r#"You are an expert productivity analyst. Your task is to analyze a log of user task events (creation and completion) and generate a comprehensive, detailed, and actionable report. The report should provide deep insights into the user's task management habits, productivity patterns, and areas for improvement.

Your response MUST be a JSON object with the following structure. Ensure all data is derived SOLELY from the provided log entries. Do not invent data.

{{
  "summaryText": "string", // A detailed, markdown-formatted textual summary of the user's productivity (min 300 words). It should cover overall trends, task breakdowns, time analysis, strengths, weaknesses, and actionable recommendations.
  "keyMetrics": {{
    "totalCreated": number,
    "totalCompleted": number,
    "completionRate": number, // Percentage, e.g., 75.5
    "averageOverallCompletionTime": number // In minutes, e.g., 60.5
  }},
  "chartData": {{
    "tasksByPriority": {{
      "LOW": {{"created": number, "completed": number}},
      "MEDIUM": {{"created": number, "completed": number}},
      "HIGH": {{"created": number, "completed": number}},
      "URGENT": {{"created": number, "completed": number}}
    }},
    "tasksByCategory": {{
      "CategoryName": {{"created": number, "completed": number}}
    }},
    "avgCompletionTimes": {{
      "Category-Priority": "string" // Average time in minutes, as a string with one decimal place.
    }}
  }},
  "categorizedTasksGrid": [
    {{
      "category": "string",
      "created": number,
      "completed": number,
      "completionRate": number, // Percentage
      "avgTime": number // Average time in minutes for completed tasks in this category
    }}
  ],
  "insights": ["string"] // An array of actionable insights and suggestions for the user (at least 5 distinct, detailed, and actionable points based on the data).
}}

Analyze the provided log entries (JSONL format) and generate the report.
For "categorizedTasksGrid", categorize tasks based on keywords in their title/description: {rules}.
Ensure all numerical values are actual numbers, not strings, unless specified (like avgCompletionTimes).
Calculate completion rates and average times accurately.
Provide at least 5 distinct, detailed, and actionable insights in the "insights" array."#,
        rules = categories::prompt_rules()
    )
}

/// Asks the model for a report over the raw log content and validates the
/// top-level shape of the reply.
pub async fn analyze(
    backend: &dyn CompletionBackend,
    log_content: &str,
) -> Result<Value, ApiError> {
    let request = CompletionRequest {
        system: build_prompt(),
        user: format!("Log entries (JSONL format):\n{}", log_content),
        temperature: TEMPERATURE,
        json_response: true,
    };
    let reply = backend.complete(request).await?;

    let report: Value = serde_json::from_str(&reply)
        .map_err(|err| ApiError::MalformedOutput(format!("report is not valid JSON: {err}")))?;
    validate_shape(&report)?;
    Ok(report)
}

fn validate_shape(report: &Value) -> Result<(), ApiError> {
    if !report["summaryText"].is_string() {
        return Err(ApiError::MalformedOutput(
            "report is missing a summaryText string".to_string(),
        ));
    }
    if !report["chartData"].is_object() {
        return Err(ApiError::MalformedOutput(
            "report is missing a chartData object".to_string(),
        ));
    }
    if !report["insights"].is_array() {
        return Err(ApiError::MalformedOutput(
            "report is missing an insights array".to_string(),
        ));
    }
    Ok(())
}
