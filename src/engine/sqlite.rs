//! SqliteEngine - on-disk engine, one table per collection.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{EngineError, StorageEngine};
use crate::record::CollectionName;

/// SQLite-backed storage engine.
///
/// Each collection is a `WITHOUT ROWID` table of `(id, body)` where `body` is
/// the serialized record. Batches run in a single transaction.
pub struct SqliteEngine {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteEngine {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self, EngineError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        debug!(path = %path.display(), %journal_mode, "opened sqlite storage");

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
        })
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, Connection>, EngineError> {
        self.conn
            .lock()
            .map_err(|_| EngineError::LockPoisoned(operation))
    }
}

impl StorageEngine for SqliteEngine {
    fn provision(&self, collections: &[CollectionName]) -> Result<(), EngineError> {
        let mut conn = self.lock("provision")?;
        let tx = conn.transaction()?;
        for collection in collections {
            tx.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS \"{}\" (
                        id TEXT PRIMARY KEY NOT NULL,
                        body BLOB NOT NULL
                    ) WITHOUT ROWID",
                    collection.as_str()
                ),
                [],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get(&self, collection: CollectionName, id: &str) -> Result<Option<Vec<u8>>, EngineError> {
        let conn = self.lock("get")?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT body FROM \"{}\" WHERE id = ?1",
            collection.as_str()
        ))?;
        let body = stmt.query_row([id], |row| row.get(0)).optional()?;
        Ok(body)
    }

    fn get_all(&self, collection: CollectionName) -> Result<Vec<Vec<u8>>, EngineError> {
        let conn = self.lock("get_all")?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT body FROM \"{}\" ORDER BY id",
            collection.as_str()
        ))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Vec<u8>>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn get_many(
        &self,
        collection: CollectionName,
        ids: &[String],
    ) -> Result<Vec<Vec<u8>>, EngineError> {
        let conn = self.lock("get_many")?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT body FROM \"{}\" WHERE id = ?1",
            collection.as_str()
        ))?;

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(body) = stmt
                .query_row([id], |row| row.get::<_, Vec<u8>>(0))
                .optional()?
            {
                results.push(body);
            }
        }
        Ok(results)
    }

    fn put_many(
        &self,
        collection: CollectionName,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<(), EngineError> {
        let mut conn = self.lock("put_many")?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT OR REPLACE INTO \"{}\" (id, body) VALUES (?1, ?2)",
                collection.as_str()
            ))?;
            for (id, bytes) in &entries {
                stmt.execute(params![id, bytes])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_many(&self, collection: CollectionName, ids: &[String]) -> Result<usize, EngineError> {
        let mut conn = self.lock("delete_many")?;
        let tx = conn.transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare_cached(&format!(
                "DELETE FROM \"{}\" WHERE id = ?1",
                collection.as_str()
            ))?;
            for id in ids {
                removed += stmt.execute([id])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }
}
