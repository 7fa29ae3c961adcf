//! Embedded SQLite state store; survives restarts.
use anyhow::Context;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use tokio::task;

use crate::store::StateStore;

/// Simple key/value table:
///   state(key TEXT PRIMARY KEY, value TEXT NOT NULL)
///
/// Keys used by the hook:
///  - last_tx_inputs_slot : i64 decimal string
pub struct SqliteState {
    path: PathBuf,
}

impl SqliteState {
    /// Creates/initializes the SQLite file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let conn = Connection::open(&path)
            .with_context(|| format!("open sqlite at {}", path.display()))?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { path })
    }

    fn kv_get(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
        let mut stmt = conn.prepare("SELECT value FROM state WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            let v: String = row.get(0)?;
            Ok(Some(v))
        } else {
            Ok(None)
        }
    }

    fn kv_set(conn: &Connection, key: &str, val: &str) -> anyhow::Result<()> {
        conn.execute(
            "INSERT INTO state(key,value) VALUES(?1,?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, val],
        )?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for SqliteState {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path.clone();
        let key = key.to_string();
        task::spawn_blocking(move || {
            let conn = Connection::open(path)?;
            Self::kv_get(&conn, &key)
        })
        .await?
    }

    async fn put(&self, key: &str, value: String) -> anyhow::Result<()> {
        let path = self.path.clone();
        let key = key.to_string();
        task::spawn_blocking(move || {
            let conn = Connection::open(path)?;
            Self::kv_set(&conn, &key, &value)
        })
        .await?
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path.clone();
        let key = key.to_string();
        task::spawn_blocking(move || {
            let conn = Connection::open(path)?;
            conn.execute("DELETE FROM state WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await?
    }
}
