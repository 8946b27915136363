//! # Taskdeck - AI-assisted task management service
//!
//! An HTTP/JSON service for creating and tracking tasks, with AI features
//! layered over the stored data.
//!
//! ## Features
//!
//! - **Task Management**: Create, update, complete, and delete tasks
//! - **Event Log**: Append-only JSONL record of task lifecycle events
//! - **AI Suggestions**: Turn a raw idea into a structured task draft
//! - **Productivity Reports**: AI-generated analysis of the event log
//! - **Task Chat**: Ask free-text questions about your stored tasks
//! - **Calendar Feed**: Tasks projected as calendar events
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskdeck::libs::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     taskdeck::server::serve(config).await
//! }
//! ```

pub mod api;
pub mod db;
pub mod libs;
pub mod server;
