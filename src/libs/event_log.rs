//! Append-only JSONL event log.
//!
//! Task lifecycle events are appended as one JSON object per line to a
//! single text file. The log is analytics-only: appends are best-effort and
//! a write failure must never fail the API call that triggered it. Reads
//! are equally forgiving, dropping lines that fail to parse instead of
//! surfacing an error. Appends go through a mutex and a single `write_all`
//! so concurrent requests never interleave partial lines.

use crate::libs::error::ApiError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "analytics.log";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    TaskCreated,
    TaskUpdated,
    TaskCompleted,
    TaskDeleted,
}

/// One log line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogEntry {
    timestamp: DateTime<Utc>,
    event: EventKind,
    task_id: String,
    details: Value,
}

pub struct EventLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EventLog {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one event line. Failures are logged and swallowed.
    pub fn record(&self, event: EventKind, task_id: &str, details: Value) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            event,
            task_id: task_id.to_string(),
            details,
        };
        let line = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!("failed to serialize log entry: {err}");
                return;
            }
        };
        if let Err(err) = self.append_line(&line) {
            tracing::error!(path = %self.path.display(), "failed to write to log file: {err}");
        }
    }

    fn append_line(&self, line: &str) -> io::Result<()> {
        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(format!("{}\n", line).as_bytes())
    }

    /// Reads the raw log content. `None` means the file does not exist,
    /// which callers treat as "nothing logged yet" rather than an error.
    pub fn read_raw(&self) -> Result<Option<String>, ApiError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Reads and parses every log line, silently dropping malformed ones.
    /// A missing file reads as an empty log.
    pub fn read_entries(&self) -> Result<Vec<Value>, ApiError> {
        let content = match self.read_raw()? {
            Some(content) => content,
            None => return Ok(Vec::new()),
        };

        let mut entries = Vec::new();
        let mut dropped = 0usize;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(value) => entries.push(value),
                Err(_) => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::warn!(path = %self.path.display(), "dropped {dropped} malformed log lines");
        }
        Ok(entries)
    }
}
