//! Database layer.
//!
//! SQLite-backed persistence for task records. The connection path is
//! always supplied explicitly (no process-wide location lookup), so tests
//! run against throwaway files.

pub mod db;
pub mod tasks;
