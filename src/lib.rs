//! Persistent, typed collection store for a desktop notification center.
//!
//! A [`Database`] lazily opens one storage handle and hands out
//! [`Collection`]s bound at compile time to their [`Record`] type. The
//! [`NotificationCenter`] sits on top and implements the provider-side
//! notification operations.

// Lets `#[derive(Record)]` expand to `::notification_store::...` inside this crate.
extern crate self as notification_store;

mod center;
mod config;
mod database;
pub mod engine;
mod error;
mod notification;
mod record;

pub use center::{LogListener, NotificationCenter, NotificationCenterListener};
pub use config::{Backend, ConfigError, DatabaseConfig};
pub use database::{Collection, Database};
pub use error::DatabaseError;
pub use notification::{ButtonOptions, Notification, NotificationSource, StoredNotification};
pub use record::{CollectionName, Record};

// Derive macro for `Record`.
pub use notification_store_macros::Record;
