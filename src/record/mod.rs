//! Records - identity-keyed entities and the closed collection registry.
//!
//! Every stored type names its collection at compile time, so a collection can
//! never be read back as the wrong record shape.
//!
//! ## Example
//!
//! ```ignore
//! use notification_store::{Record, CollectionName};
//!
//! #[derive(Serialize, Deserialize, Clone, Record)]
//! #[record(collection = Notifications)]
//! struct StoredNotification {
//!     #[record(id)]
//!     pub id: String,
//!     pub title: String,
//! }
//!
//! let notes = database.get::<StoredNotification>()?;
//! notes.upsert(&note).await?;
//! ```

mod collection_name;

use serde::{de::DeserializeOwned, Serialize};

pub use collection_name::CollectionName;

/// Trait for types that can be stored in a [`Collection`](crate::Collection).
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection this record type lives in.
    const COLLECTION: CollectionName;

    /// Returns the unique identifier for this record.
    ///
    /// Assigned by the caller before storage; the store never generates ids.
    fn id(&self) -> &str;
}
