//! SQLite-backed snapshot store.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{LookupSnapshot, SnapshotStore, WordListRecord};
use crate::error::{WordbankError, WordbankResult};
use crate::traits::Lookup;

/// SQLite-backed snapshot store.
///
/// Word lists live in `word_lists` as JSON records; cached lookups live in
/// `lookup_cache` with a NULL canonical form for "not found".
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    /// Open (or create) a store at the given path.
    pub fn new(path: impl AsRef<Path>) -> WordbankResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Opened snapshot store");
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> WordbankResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> WordbankResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| WordbankError::database(e.to_string()))
    }

    fn init_schema(&self) -> WordbankResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS word_lists (
                username TEXT PRIMARY KEY,
                record TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS lookup_cache (
                raw TEXT PRIMARY KEY,
                canonical TEXT,
                frequency REAL
            );
        "#,
        )?;
        Ok(())
    }

    /// Store a raw record body without validation (used by recovery tooling and tests).
    pub fn save_raw(&self, username: &str, body: &str) -> WordbankResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO word_lists (username, record, updated_at) VALUES (?1, ?2, ?3)",
            params![username, body, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn save_list(&self, record: &WordListRecord) -> WordbankResult<()> {
        let body = serde_json::to_string(record)?;
        self.save_raw(&record.username, &body)
    }

    fn load_list(&self, username: &str) -> WordbankResult<Option<WordListRecord>> {
        let body: Option<String> = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT record FROM word_lists WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()?
        };

        body.map(|body| {
            serde_json::from_str::<WordListRecord>(&body)
                .map_err(|e| WordbankError::corrupted_record(username, e))
        })
        .transpose()
    }

    fn list_usernames(&self) -> WordbankResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT username FROM word_lists ORDER BY username")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut usernames = Vec::new();
        for row in rows {
            usernames.push(row?);
        }
        Ok(usernames)
    }

    fn save_lookups(&self, entries: &LookupSnapshot) -> WordbankResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO lookup_cache (raw, canonical, frequency) VALUES (?1, ?2, ?3)",
            )?;
            for (raw, lookup) in entries {
                match lookup {
                    Some(lookup) => stmt.execute(params![raw, lookup.canonical, lookup.frequency])?,
                    None => stmt.execute(params![raw, Option::<String>::None, Option::<f64>::None])?,
                };
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_lookups(&self) -> WordbankResult<LookupSnapshot> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT raw, canonical, frequency FROM lookup_cache")?;
        let rows = stmt.query_map([], |row| {
            let raw: String = row.get(0)?;
            let canonical: Option<String> = row.get(1)?;
            let frequency: Option<f64> = row.get(2)?;
            Ok((raw, canonical, frequency))
        })?;

        let mut entries = LookupSnapshot::new();
        for row in rows {
            let (raw, canonical, frequency) = row?;
            let lookup = canonical.map(|c| Lookup::new(c, frequency.unwrap_or(0.0)));
            entries.insert(raw, lookup);
        }
        Ok(entries)
    }
}
