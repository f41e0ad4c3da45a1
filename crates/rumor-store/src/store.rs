use std::path::{Path, PathBuf};
use std::{env, fs};

use rusqlite::{Connection, params};

use crate::error::{Result, StoreError};
use crate::schema;

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "rumor.db";

/// Default data directory: `~/.rumor`.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".rumor")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// SQLite-backed queues and tables for every pipeline stage.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Open `<base_dir>/rumor.db`, creating the directory when missing.
    pub fn open_in_dir(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir).map_err(|e| {
            StoreError::InvalidData(format!("failed to create {}: {e}", base_dir.display()))
        })?;
        let path = base_dir.join(DB_FILE_NAME);
        tracing::debug!("opening store at {}", path.display());
        Self::open(&path)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Stats ---

    pub fn count_items(&self, table: &str) -> Result<u64> {
        self.count(
            "SELECT COUNT(*) FROM news_items WHERE table_name = ?1",
            table,
        )
    }

    pub fn count_preferences(&self, table: &str) -> Result<u64> {
        self.count(
            "SELECT COUNT(*) FROM preferences WHERE table_name = ?1",
            table,
        )
    }

    pub fn count_reports(&self, table: &str) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM reports WHERE table_name = ?1", table)
    }

    pub(crate) fn count(&self, sql: &str, key: &str) -> Result<u64> {
        let n: i64 = self.conn.query_row(sql, [key], |row| row.get(0))?;
        Ok(n as u64)
    }
}
