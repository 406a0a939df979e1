//! Storage engines - byte-level persistence behind the typed collections.
//!
//! Engines are synchronous; [`Collection`](crate::Collection) runs every call
//! on tokio's blocking pool. Each call is atomic on its own. Records arrive
//! already serialized and keyed by id.

mod in_memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use thiserror::Error;

use crate::record::CollectionName;

pub use in_memory::InMemoryEngine;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteEngine;

/// Error type for storage engine calls.
#[derive(Debug, Error)]
pub enum EngineError {
    #[cfg(feature = "sqlite")]
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The collection was never provisioned on this engine.
    #[error("collection {0} is not provisioned")]
    MissingTable(String),

    #[error("engine lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// The blocking task running the engine call panicked or was cancelled.
    #[error("storage task failed: {0}")]
    TaskJoin(String),
}

/// Byte-level CRUD over named tables.
pub trait StorageEngine: Send + Sync + 'static {
    /// Create a table for every given collection if it does not exist yet.
    fn provision(&self, collections: &[CollectionName]) -> Result<(), EngineError>;

    /// Fetch one serialized record.
    fn get(&self, collection: CollectionName, id: &str) -> Result<Option<Vec<u8>>, EngineError>;

    /// Fetch every serialized record, in ascending id order.
    fn get_all(&self, collection: CollectionName) -> Result<Vec<Vec<u8>>, EngineError>;

    /// Fetch the records for `ids` that exist, in the order of `ids`.
    fn get_many(
        &self,
        collection: CollectionName,
        ids: &[String],
    ) -> Result<Vec<Vec<u8>>, EngineError>;

    /// Insert or fully replace each `(id, bytes)` entry, in order.
    fn put_many(
        &self,
        collection: CollectionName,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<(), EngineError>;

    /// Remove the given ids, ignoring absent ones. Returns how many existed.
    fn delete_many(&self, collection: CollectionName, ids: &[String]) -> Result<usize, EngineError>;
}
