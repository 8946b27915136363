//! Task store over SQLite.
//!
//! All task reads and writes go through [`Tasks`]. Priorities and statuses
//! are stored as their wire-format text; timestamps are stored as RFC 3339
//! text, which also makes the newest-first ordering a plain `ORDER BY`.

use super::db::Db;
use crate::libs::task::Task;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde_json::Value;
use std::path::Path;

const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id TEXT NOT NULL PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    priority TEXT NOT NULL,
    status TEXT NOT NULL,
    time_estimate INTEGER NOT NULL,
    due_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    completed_at TEXT
);";
const INSERT_TASK: &str = "INSERT INTO tasks (id, title, description, priority, status, time_estimate, due_date, created_at, updated_at, completed_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const SELECT_TASKS: &str = "SELECT id, title, description, priority, status, time_estimate, due_date, created_at, updated_at, completed_at FROM tasks";
const ORDER_NEWEST_FIRST: &str = "ORDER BY created_at DESC, rowid DESC";
const WHERE_ID: &str = "WHERE id = ?1";
const UPDATE_TASK: &str = "UPDATE tasks SET title = ?2, description = ?3, priority = ?4, status = ?5, time_estimate = ?6, due_date = ?7, updated_at = ?8, completed_at = ?9 WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

pub struct Tasks {
    pub conn: Connection,
}

impl Tasks {
    pub fn new(db_path: &Path) -> anyhow::Result<Tasks> {
        let db = Db::open(db_path)?;
        db.conn.execute(SCHEMA_TASKS, [])?;
        Ok(Tasks { conn: db.conn })
    }

    pub fn insert(&self, task: &Task) -> Result<()> {
        self.conn.execute(
            INSERT_TASK,
            params![
                task.id,
                task.title,
                task.description,
                task.priority.to_string(),
                task.status.to_string(),
                task.time_estimate,
                task.due_date,
                task.created_at,
                task.updated_at,
                task.completed_at,
            ],
        )?;
        Ok(())
    }

    /// All tasks, newest first. Same-timestamp inserts keep insertion
    /// order reversed via the rowid tiebreak.
    pub fn fetch_all(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!("{} {}", SELECT_TASKS, ORDER_NEWEST_FIRST))?;
        let task_iter = stmt.query_map([], map_task_row)?;
        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Task>> {
        self.conn
            .query_row(&format!("{} {}", SELECT_TASKS, WHERE_ID), params![id], map_task_row)
            .optional()
    }

    /// Writes back every mutable column of an already-merged task record.
    pub fn update(&self, task: &Task) -> Result<usize> {
        self.conn.execute(
            UPDATE_TASK,
            params![
                task.id,
                task.title,
                task.description,
                task.priority.to_string(),
                task.status.to_string(),
                task.time_estimate,
                task.due_date,
                task.updated_at,
                task.completed_at,
            ],
        )
    }

    pub fn delete(&self, id: &str) -> Result<usize> {
        self.conn.execute(DELETE_TASK, params![id])
    }
}

fn map_task_row(row: &Row) -> Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        priority: decode_enum(3, row.get(3)?)?,
        status: decode_enum(4, row.get(4)?)?,
        time_estimate: row.get(5)?,
        due_date: row.get::<_, Option<DateTime<Utc>>>(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        completed_at: row.get::<_, Option<DateTime<Utc>>>(9)?,
    })
}

/// Decodes a stored enum column through its serde wire name.
fn decode_enum<T: serde::de::DeserializeOwned>(idx: usize, raw: String) -> Result<T> {
    serde_json::from_value(Value::String(raw))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}
