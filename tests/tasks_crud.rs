#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use serde_json::json;
    use std::collections::HashSet;
    use taskdeck::db::tasks::Tasks;
    use taskdeck::libs::task::{Task, TaskDraft, TaskPatch, TaskStatus};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct TaskTestContext {
        _temp_dir: TempDir,
        tasks: Tasks,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let tasks = Tasks::new(&temp_dir.path().join("taskdeck.db")).unwrap();
            TaskTestContext {
                _temp_dir: temp_dir,
                tasks,
            }
        }
    }

    fn make_task(title: &str, created_at: DateTime<Utc>) -> Task {
        let draft = TaskDraft {
            title: Some(title.to_string()),
            ..Default::default()
        };
        Task::from_draft(draft, created_at).unwrap()
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_fetch_all_newest_first(ctx: &mut TaskTestContext) {
        let base: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let first = make_task("First task", base);
        let second = make_task("Second task", base + Duration::seconds(1));
        ctx.tasks.insert(&first).unwrap();
        ctx.tasks.insert(&second).unwrap();

        let all = ctx.tasks.fetch_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Second task");
        assert_eq!(all[1].title, "First task");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_same_timestamp_keeps_insertion_order_reversed(ctx: &mut TaskTestContext) {
        let at: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        for i in 1..=3 {
            ctx.tasks.insert(&make_task(&format!("Task {}", i), at)).unwrap();
        }

        let all = ctx.tasks.fetch_all().unwrap();
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Task 3", "Task 2", "Task 1"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_get_by_id(ctx: &mut TaskTestContext) {
        let task = make_task("Find me", Utc::now());
        ctx.tasks.insert(&task).unwrap();

        let found = ctx.tasks.get_by_id(&task.id).unwrap().unwrap();
        assert_eq!(found.title, "Find me");
        assert_eq!(found.status, TaskStatus::Todo);
        assert!(ctx.tasks.get_by_id("no-such-id").unwrap().is_none());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_update_roundtrip(ctx: &mut TaskTestContext) {
        let created: DateTime<Utc> = "2024-05-01T08:00:00Z".parse().unwrap();
        let mut task = make_task("Ship the release", created);
        ctx.tasks.insert(&task).unwrap();

        let later = created + Duration::hours(2);
        let patch: TaskPatch = serde_json::from_value(json!({
            "status": "COMPLETED",
            "timeEstimate": "90",
            "description": "Tag, build, publish"
        }))
        .unwrap();
        let completed = task.apply(patch, later).unwrap();
        assert!(completed);
        assert_eq!(ctx.tasks.update(&task).unwrap(), 1);

        let stored = ctx.tasks.get_by_id(&task.id).unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
        assert_eq!(stored.completed_at, Some(later));
        assert_eq!(stored.updated_at, later);
        assert_eq!(stored.time_estimate, 90);
        assert_eq!(stored.description.as_deref(), Some("Tag, build, publish"));
        // Creation timestamp never moves.
        assert_eq!(stored.created_at, created);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_delete(ctx: &mut TaskTestContext) {
        let task = make_task("Temporary", Utc::now());
        ctx.tasks.insert(&task).unwrap();

        assert_eq!(ctx.tasks.delete(&task.id).unwrap(), 1);
        assert!(ctx.tasks.get_by_id(&task.id).unwrap().is_none());
        assert_eq!(ctx.tasks.delete(&task.id).unwrap(), 0);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_ids_are_unique(ctx: &mut TaskTestContext) {
        let mut ids = HashSet::new();
        for i in 0..20 {
            let task = make_task(&format!("Task {}", i), Utc::now());
            ctx.tasks.insert(&task).unwrap();
            ids.insert(task.id);
        }
        assert_eq!(ids.len(), 20);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_unparsable_time_estimate_persists_default(ctx: &mut TaskTestContext) {
        let draft = TaskDraft {
            title: Some("Fuzzy estimate".to_string()),
            time_estimate: Some(json!("abc")),
            ..Default::default()
        };
        let task = Task::from_draft(draft, Utc::now()).unwrap();
        ctx.tasks.insert(&task).unwrap();

        let stored = ctx.tasks.get_by_id(&task.id).unwrap().unwrap();
        assert_eq!(stored.time_estimate, 30);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_optional_fields_survive_storage(ctx: &mut TaskTestContext) {
        let due: DateTime<Utc> = "2024-12-24T18:00:00Z".parse().unwrap();
        let draft = TaskDraft {
            title: Some("Wrap presents".to_string()),
            description: Some("Before the 24th, ideally".to_string()),
            due_date: Some(due),
            ..Default::default()
        };
        let task = Task::from_draft(draft, Utc::now()).unwrap();
        ctx.tasks.insert(&task).unwrap();

        let stored = ctx.tasks.get_by_id(&task.id).unwrap().unwrap();
        assert_eq!(stored.due_date, Some(due));
        assert_eq!(stored.description.as_deref(), Some("Before the 24th, ideally"));
        assert!(stored.completed_at.is_none());
    }
}
