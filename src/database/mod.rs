//! Database - lazily opened storage handle and typed collections.
//!
//! ```ignore
//! let database = Database::new(DatabaseConfig::default()).delayed_init().await?;
//! let notes = database.get::<StoredNotification>()?;
//!
//! notes.upsert(&note).await?;
//! let loaded = notes.get(&note.id).await?;
//! notes.delete_many(["a", "b"]).await?;
//! ```

mod collection;
#[allow(clippy::module_inception)]
mod database;

pub use collection::Collection;
pub use database::Database;
