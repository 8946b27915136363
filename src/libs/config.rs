//! Runtime configuration.
//!
//! Settings come from environment variables (a `.env` file is honored via
//! `dotenv` in main), with CLI flags overriding on top. The database and
//! event log default to the platform application-data directory; both paths
//! are explicit values handed to the stores at construction, so tests can
//! point everything at a temp directory.

use crate::api::openai::OpenAiConfig;
use anyhow::Result;
use std::env::consts::OS;
use std::env::var;
use std::path::{Path, PathBuf};

pub const VENDOR_NAME: &str = "lacodda";
pub const APP_NAME: &str = "taskdeck";

pub const DB_FILE_NAME: &str = "taskdeck.db";
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    /// Model provider settings; `None` when `OPENAI_API_KEY` is unset.
    /// AI endpoints fail at request time in that case, everything else
    /// keeps working.
    pub openai: Option<OpenAiConfig>,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let data_dir = default_data_dir();

        let bind = var("TASKDECK_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let port = match var("TASKDECK_PORT") {
            Ok(raw) => raw.parse()?,
            Err(_) => DEFAULT_PORT,
        };
        let db_path = var("TASKDECK_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join(DB_FILE_NAME));
        let log_path = var("TASKDECK_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join(crate::libs::event_log::LOG_FILE_NAME));

        Ok(Config {
            bind,
            port,
            db_path,
            log_path,
            openai: OpenAiConfig::from_env(),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Platform application-data directory for this service.
pub fn default_data_dir() -> PathBuf {
    let base = match OS {
        "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
        "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
        _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
    };
    Path::new(&base).join(VENDOR_NAME).join(APP_NAME)
}
