//! Collection - typed CRUD over one named table.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::{EngineError, StorageEngine};
use crate::error::DatabaseError;
use crate::record::{CollectionName, Record};

/// Typed accessor for the records of one collection.
///
/// Cheap to clone; every clone shares the database's storage handle.
pub struct Collection<T> {
    engine: Arc<dyn StorageEngine>,
    name: CollectionName,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            name: self.name,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection").field("name", &self.name).finish()
    }
}

impl<T: Record> Collection<T> {
    pub(crate) fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self {
            engine,
            name: T::COLLECTION,
            _marker: PhantomData,
        }
    }

    /// The collection this accessor is bound to.
    pub fn name(&self) -> CollectionName {
        self.name
    }

    /// Get a record by ID. Returns `None` if not found.
    pub async fn get(&self, id: &str) -> Result<Option<T>, DatabaseError> {
        let id = id.to_string();
        let bytes = self
            .run(move |engine, name| engine.get(name, &id))
            .await
            .map_err(|err| self.read_error(err))?;

        bytes.map(|bytes| decode(&bytes)).transpose()
    }

    /// Get every record, in ascending ID order. Empty collections yield an
    /// empty vector.
    pub async fn get_all(&self) -> Result<Vec<T>, DatabaseError> {
        let rows = self
            .run(|engine, name| engine.get_all(name))
            .await
            .map_err(|err| self.read_error(err))?;

        debug!(collection = %self.name, count = rows.len(), "get_all");
        rows.iter().map(|bytes| decode(bytes)).collect()
    }

    /// Get the records for the given IDs.
    ///
    /// Missing IDs are skipped and repeated IDs yield a single record. Results
    /// follow the order in which IDs were first supplied.
    pub async fn get_many<I>(&self, ids: I) -> Result<Vec<T>, DatabaseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let requested = ids.len();
        let rows = self
            .run(move |engine, name| engine.get_many(name, &ids))
            .await
            .map_err(|err| self.read_error(err))?;

        debug!(collection = %self.name, requested, found = rows.len(), "get_many");
        rows.iter().map(|bytes| decode(bytes)).collect()
    }

    /// Insert or fully replace a record.
    pub async fn upsert(&self, record: &T) -> Result<(), DatabaseError> {
        self.upsert_many(std::slice::from_ref(record)).await
    }

    /// Insert or fully replace a batch of records in one atomic write.
    ///
    /// If the batch repeats an ID, the later record wins.
    pub async fn upsert_many(&self, records: &[T]) -> Result<(), DatabaseError> {
        if records.is_empty() {
            return Ok(());
        }

        let entries = records
            .iter()
            .map(|record| Ok((record.id().to_string(), serde_json::to_vec(record)?)))
            .collect::<Result<Vec<_>, DatabaseError>>()?;

        let count = entries.len();
        self.run(move |engine, name| engine.put_many(name, entries))
            .await
            .map_err(|err| self.write_error(err))?;

        debug!(collection = %self.name, count, "upsert");
        Ok(())
    }

    /// Delete a record by ID. Returns true if it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        Ok(self.delete_many([id]).await? > 0)
    }

    /// Delete every given ID in one atomic write, ignoring IDs that do not
    /// exist. Returns how many records were removed.
    pub async fn delete_many<I>(&self, ids: I) -> Result<usize, DatabaseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(0);
        }

        let removed = self
            .run(move |engine, name| engine.delete_many(name, &ids))
            .await
            .map_err(|err| self.write_error(err))?;

        debug!(collection = %self.name, removed, "delete");
        Ok(removed)
    }

    async fn run<R, F>(&self, f: F) -> Result<R, EngineError>
    where
        F: FnOnce(&dyn StorageEngine, CollectionName) -> Result<R, EngineError> + Send + 'static,
        R: Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let name = self.name;
        tokio::task::spawn_blocking(move || f(engine.as_ref(), name))
            .await
            .map_err(|err| EngineError::TaskJoin(err.to_string()))?
    }

    fn read_error(&self, err: EngineError) -> DatabaseError {
        warn!(collection = %self.name, error = %err, "storage read failed");
        DatabaseError::read(self.name.as_str(), err)
    }

    fn write_error(&self, err: EngineError) -> DatabaseError {
        warn!(collection = %self.name, error = %err, "storage write failed");
        DatabaseError::write(self.name.as_str(), err)
    }
}

fn decode<T: Record>(bytes: &[u8]) -> Result<T, DatabaseError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn unique_ids<I>(ids: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(|id| id.as_ref().to_string())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
