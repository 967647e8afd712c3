//! SQLite-backed durable key-value store for the local fallback.
//!
//! All database operations run in `spawn_blocking` to avoid blocking the
//! async runtime.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tokio::task;
use vsme_core::KeyValueStore;
use vsme_domain::{Result, VsmeError};

use super::manager::{map_sql_error, DbManager, SqliteConnection};

/// [`KeyValueStore`] backed by the `kv_entries` table
pub struct SqliteKeyValueStore {
    db: Arc<DbManager>,
}

impl SqliteKeyValueStore {
    /// Wrap a manager whose migrations already ran.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteConnection) -> rusqlite::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<T> {
            let conn = db.get_connection()?;
            op(&conn).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run(move |conn| {
            conn.query_row("SELECT value FROM kv_entries WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, chrono::Utc::now().timestamp_millis()],
            )
            .map(|_| ())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.run(move |conn| {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key]).map(|_| ())
        })
        .await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.to_string();
        self.run(move |conn| {
            // substr comparison keeps `%` and `_` in keys literal
            let mut stmt = conn.prepare(
                "SELECT key FROM kv_entries WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
            )?;
            let keys = stmt.query_map(params![prefix], |row| row.get::<_, String>(0))?;
            keys.collect()
        })
        .await
    }
}

fn map_join_error(err: task::JoinError) -> VsmeError {
    VsmeError::Internal(format!("storage task failed: {err}"))
}
