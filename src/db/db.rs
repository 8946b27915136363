use anyhow::Result;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// SQLite connection handle. Opened from an explicit path supplied by the
/// caller; the parent directory is created if needed.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    pub fn open(path: &Path) -> Result<Db> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Db { conn })
    }
}
