//! Calendar projection of stored tasks.
//!
//! Read-side only: every task becomes one point-in-time calendar event,
//! anchored at its due date when it has one and its creation time otherwise.

use crate::libs::task::Task;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&Task> for CalendarEvent {
    fn from(task: &Task) -> Self {
        let anchor = task.due_date.unwrap_or(task.created_at);
        CalendarEvent {
            id: task.id.clone(),
            title: task.title.clone(),
            start: anchor,
            end: anchor,
        }
    }
}

/// Projects every task to its calendar event.
pub fn project(tasks: &[Task]) -> Vec<CalendarEvent> {
    tasks.iter().map(CalendarEvent::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::{Task, TaskDraft};

    fn task_with_due(due: Option<&str>) -> Task {
        let created: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let draft = TaskDraft {
            title: Some("Dentist appointment".to_string()),
            due_date: due.map(|d| d.parse().unwrap()),
            ..Default::default()
        };
        Task::from_draft(draft, created).unwrap()
    }

    #[test]
    fn test_event_anchored_at_due_date() {
        let task = task_with_due(Some("2024-02-15T09:30:00Z"));
        let event = CalendarEvent::from(&task);
        assert_eq!(event.start, task.due_date.unwrap());
        assert_eq!(event.end, event.start);
    }

    #[test]
    fn test_event_falls_back_to_created_at() {
        let task = task_with_due(None);
        let event = CalendarEvent::from(&task);
        assert_eq!(event.start, task.created_at);
        assert_eq!(event.end, task.created_at);
        assert_eq!(event.id, task.id);
        assert_eq!(event.title, task.title);
    }

    #[test]
    fn test_project_maps_every_task() {
        let tasks = vec![task_with_due(None), task_with_due(Some("2024-03-01T00:00:00Z"))];
        let events = project(&tasks);
        assert_eq!(events.len(), 2);
    }
}
