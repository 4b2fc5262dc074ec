//! SQLite-backed profile store.
//!
//! Holds the long-lived state shared by every tab of a profile:
//! - usage statistics for the engagement gate (kv, JSON)
//! - the anonymous survey identifier (kv)
//! - a log of completed sessions for CLI statistics

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::engagement::UsageStats;
use crate::error::StorageError;

const USAGE_STATS_KEY: &str = "usage_stats";
const ANONYMOUS_ID_KEY: &str = "anonymous_id";

/// Aggregate view over the session log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub today_sessions: u64,
}

/// SQLite database at `<data dir>/intently.db`.
pub struct ProfileDb {
    conn: Connection,
}

impl ProfileDb {
    /// Open the profile database in the default data directory.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?)
    }

    /// Open the profile database under an explicit directory.
    pub fn open_at(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join("intently.db");
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                intention    TEXT NOT NULL DEFAULT '',
                minutes      INTEGER NOT NULL,
                infinite     INTEGER NOT NULL DEFAULT 0,
                started_at   TEXT NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
        )?;
        Ok(())
    }

    // ── Key-value ────────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    // ── Usage statistics ─────────────────────────────────────────────

    /// Load the profile's usage statistics, defaulting for a fresh install.
    ///
    /// A corrupt record is replaced by the default rather than failing the
    /// caller; the original counters cannot be recovered anyway.
    pub fn load_stats(&self) -> Result<UsageStats, StorageError> {
        match self.kv_get(USAGE_STATS_KEY)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(stats) => Ok(stats),
                Err(e) => {
                    eprintln!("Warning: resetting corrupt usage stats: {e}");
                    Ok(UsageStats::default())
                }
            },
            None => Ok(UsageStats::default()),
        }
    }

    pub fn save_stats(&self, stats: &UsageStats) -> Result<(), StorageError> {
        let json = serde_json::to_string(stats)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        self.kv_set(USAGE_STATS_KEY, &json)
    }

    // ── Anonymous identifier ─────────────────────────────────────────

    /// Get or create the anonymous survey identifier for this profile.
    /// Random, never derived from anything personally identifiable.
    pub fn anonymous_id(&self) -> Result<String, StorageError> {
        if let Some(id) = self.kv_get(ANONYMOUS_ID_KEY)? {
            return Ok(id);
        }
        let id = format!("user-{}", Uuid::new_v4());
        self.kv_set(ANONYMOUS_ID_KEY, &id)?;
        Ok(id)
    }

    // ── Session log ──────────────────────────────────────────────────

    /// Append a completed session to the log.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(
        &self,
        intention: Option<&str>,
        minutes: u64,
        infinite: bool,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO sessions (intention, minutes, infinite, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                intention.unwrap_or(""),
                minutes,
                infinite,
                started_at.to_rfc3339(),
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn session_summary(&self) -> Result<SessionSummary, StorageError> {
        let (total_sessions, total_minutes) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(minutes), 0) FROM sessions",
            [],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;

        let midnight = Utc::now().format("%Y-%m-%d").to_string();
        let today_sessions = self.conn.query_row(
            "SELECT COUNT(*) FROM sessions WHERE completed_at >= ?1",
            params![format!("{midnight}T00:00:00+00:00")],
            |row| row.get::<_, u64>(0),
        )?;

        Ok(SessionSummary {
            total_sessions,
            total_minutes,
            today_sessions,
        })
    }
}
