//! InMemoryEngine - BTreeMap-backed engine for tests and ephemeral sessions.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::{EngineError, StorageEngine};
use crate::record::CollectionName;

type Table = BTreeMap<String, Vec<u8>>;

/// In-memory storage engine.
///
/// One ordered map per provisioned collection, all behind a single lock so
/// every batch is applied atomically.
#[derive(Default)]
pub struct InMemoryEngine {
    tables: RwLock<HashMap<CollectionName, Table>>,
}

impl InMemoryEngine {
    /// Create an engine with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(
        &self,
        collection: CollectionName,
        operation: &'static str,
        f: impl FnOnce(&Table) -> R,
    ) -> Result<R, EngineError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| EngineError::LockPoisoned(operation))?;
        let table = tables
            .get(&collection)
            .ok_or_else(|| EngineError::MissingTable(collection.to_string()))?;
        Ok(f(table))
    }

    fn write<R>(
        &self,
        collection: CollectionName,
        operation: &'static str,
        f: impl FnOnce(&mut Table) -> R,
    ) -> Result<R, EngineError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| EngineError::LockPoisoned(operation))?;
        let table = tables
            .get_mut(&collection)
            .ok_or_else(|| EngineError::MissingTable(collection.to_string()))?;
        Ok(f(table))
    }
}

impl StorageEngine for InMemoryEngine {
    fn provision(&self, collections: &[CollectionName]) -> Result<(), EngineError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| EngineError::LockPoisoned("provision"))?;
        for collection in collections {
            tables.entry(*collection).or_default();
        }
        Ok(())
    }

    fn get(&self, collection: CollectionName, id: &str) -> Result<Option<Vec<u8>>, EngineError> {
        self.read(collection, "get", |table| table.get(id).cloned())
    }

    fn get_all(&self, collection: CollectionName) -> Result<Vec<Vec<u8>>, EngineError> {
        self.read(collection, "get_all", |table| table.values().cloned().collect())
    }

    fn get_many(
        &self,
        collection: CollectionName,
        ids: &[String],
    ) -> Result<Vec<Vec<u8>>, EngineError> {
        self.read(collection, "get_many", |table| {
            ids.iter().filter_map(|id| table.get(id).cloned()).collect()
        })
    }

    fn put_many(
        &self,
        collection: CollectionName,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<(), EngineError> {
        self.write(collection, "put_many", |table| {
            for (id, bytes) in entries {
                table.insert(id, bytes);
            }
        })
    }

    fn delete_many(&self, collection: CollectionName, ids: &[String]) -> Result<usize, EngineError> {
        self.write(collection, "delete_many", |table| {
            ids.iter().filter(|id| table.remove(*id).is_some()).count()
        })
    }
}
