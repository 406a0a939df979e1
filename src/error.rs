use thiserror::Error;

use crate::engine::EngineError;

/// Errors surfaced by [`Database`](crate::Database) and
/// [`Collection`](crate::Collection).
///
/// A missing record is never an error: lookups return `None` and deletes of
/// unknown ids are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseError {
    /// The collection name is not part of the registry, or does not belong
    /// to the requested record type.
    #[error("invalid collection: {name}")]
    InvalidCollection { name: String },

    /// A collection was requested before `delayed_init` resolved.
    #[error("database accessed before initialization completed")]
    NotInitialized,

    /// The storage engine could not be opened or provisioned.
    #[error("database initialization failed: {message}")]
    Initialization { message: String },

    /// Engine failure during get / get_all / get_many.
    #[error("storage read error on {collection}: {message}")]
    StorageRead { collection: String, message: String },

    /// Engine failure during upsert / delete.
    #[error("storage write error on {collection}: {message}")]
    StorageWrite { collection: String, message: String },

    /// Record serialization/deserialization error.
    #[error("record serialization error: {0}")]
    Serde(String),
}

impl DatabaseError {
    pub(crate) fn read(collection: &str, err: EngineError) -> Self {
        DatabaseError::StorageRead {
            collection: collection.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(collection: &str, err: EngineError) -> Self {
        DatabaseError::StorageWrite {
            collection: collection.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn initialization(err: impl std::fmt::Display) -> Self {
        DatabaseError::Initialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::Serde(err.to_string())
    }
}
