//! Task model and request shapes.
//!
//! A task is the unit of work tracked by the service: a title, an optional
//! description, a priority, a status, a time estimate in minutes, and an
//! optional due date. Creation drafts and patches arrive as JSON and are
//! normalized here before anything touches the database.

use crate::libs::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Fallback time estimate in minutes when the caller sends nothing usable.
pub const DEFAULT_TIME_ESTIMATE: i64 = 30;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        };
        write!(f, "{}", s)
    }
}

/// A stored task record. Serializes with the camelCase field names the
/// HTTP API exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub time_estimate: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Incoming body for task creation. Everything but the title is optional;
/// `timeEstimate` is accepted as any JSON value and normalized.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub time_estimate: Option<Value>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Incoming body for `PATCH /tasks/{id}`. The patchable field set is
/// explicit; anything else in the body is ignored. `description` and
/// `dueDate` use a double `Option` so an explicit `null` clears the field
/// while an absent key leaves it untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "some_nullable")]
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub time_estimate: Option<Value>,
    #[serde(default, deserialize_with = "some_nullable")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Wraps a present-but-possibly-null field as `Some(Option<T>)`.
fn some_nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Normalizes a raw `timeEstimate` value to a positive integer of minutes.
///
/// Accepts JSON numbers (floats are truncated) and numeric strings.
/// Anything absent, non-numeric, or non-positive falls back to
/// [`DEFAULT_TIME_ESTIMATE`].
pub fn normalize_time_estimate(raw: Option<&Value>) -> i64 {
    let minutes = match raw {
        Some(Value::Number(n)) => n.as_f64().map(|f| f as i64),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    };
    match minutes {
        Some(m) if m > 0 => m,
        _ => DEFAULT_TIME_ESTIMATE,
    }
}

impl Task {
    /// Builds a new task from a creation draft.
    ///
    /// Fails with a validation error when the title is missing or blank.
    pub fn from_draft(draft: TaskDraft, now: DateTime<Utc>) -> Result<Self, ApiError> {
        let title = match draft.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(ApiError::Validation("Title is required".to_string())),
        };

        Ok(Task {
            id: Uuid::new_v4().to_string(),
            title,
            description: draft.description,
            priority: draft.priority.unwrap_or_default(),
            status: TaskStatus::default(),
            time_estimate: normalize_time_estimate(draft.time_estimate.as_ref()),
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
            completed_at: None,
        })
    }

    /// Merges a patch into the task and stamps `updatedAt`.
    ///
    /// `completedAt` is stamped when the patch moves the status to
    /// COMPLETED and cleared when it moves away. Returns `true` when this
    /// patch completed the task.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) -> Result<bool, ApiError> {
        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(ApiError::Validation("Title is required".to_string()));
            }
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(raw) = patch.time_estimate {
            self.time_estimate = normalize_time_estimate(Some(&raw));
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }

        let mut completed_now = false;
        if let Some(status) = patch.status {
            let was_completed = self.status == TaskStatus::Completed;
            self.status = status;
            match (was_completed, status == TaskStatus::Completed) {
                (false, true) => {
                    self.completed_at = Some(now);
                    completed_now = true;
                }
                (true, false) => self.completed_at = None,
                _ => {}
            }
        }

        self.updated_at = now;
        Ok(completed_now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_normalize_time_estimate() {
        assert_eq!(normalize_time_estimate(Some(&json!(45))), 45);
        assert_eq!(normalize_time_estimate(Some(&json!(12.7))), 12);
        assert_eq!(normalize_time_estimate(Some(&json!("90"))), 90);
        assert_eq!(normalize_time_estimate(Some(&json!("abc"))), 30);
        assert_eq!(normalize_time_estimate(Some(&json!(-5))), 30);
        assert_eq!(normalize_time_estimate(Some(&json!(null))), 30);
        assert_eq!(normalize_time_estimate(None), 30);
    }

    #[test]
    fn test_from_draft_requires_title() {
        let err = Task::from_draft(TaskDraft::default(), now()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let draft = TaskDraft {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(Task::from_draft(draft, now()).is_err());
    }

    #[test]
    fn test_from_draft_defaults() {
        let draft = TaskDraft {
            title: Some("Water the plants".to_string()),
            ..Default::default()
        };
        let task = Task::from_draft(draft, now()).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.time_estimate, 30);
        assert!(task.completed_at.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_apply_stamps_and_clears_completed_at() {
        let draft = TaskDraft {
            title: Some("Ship release".to_string()),
            ..Default::default()
        };
        let mut task = Task::from_draft(draft, now()).unwrap();

        let later: DateTime<Utc> = "2024-01-02T00:00:00Z".parse().unwrap();
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let completed = task.apply(patch, later).unwrap();
        assert!(completed);
        assert_eq!(task.completed_at, Some(later));
        assert_eq!(task.updated_at, later);

        let patch = TaskPatch {
            status: Some(TaskStatus::Todo),
            ..Default::default()
        };
        let completed = task.apply(patch, later).unwrap();
        assert!(!completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_patch_null_clears_due_date() {
        let draft = TaskDraft {
            title: Some("Book flights".to_string()),
            due_date: Some(now()),
            ..Default::default()
        };
        let mut task = Task::from_draft(draft, now()).unwrap();

        // An absent key leaves the field untouched.
        let patch: TaskPatch = serde_json::from_value(json!({ "priority": "HIGH" })).unwrap();
        task.apply(patch, now()).unwrap();
        assert!(task.due_date.is_some());
        assert_eq!(task.priority, Priority::High);

        // An explicit null clears it.
        let patch: TaskPatch = serde_json::from_value(json!({ "dueDate": null })).unwrap();
        task.apply(patch, now()).unwrap();
        assert!(task.due_date.is_none());
    }
}
