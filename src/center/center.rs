use std::sync::{Arc, RwLock};

use super::{LogListener, NotificationCenterListener};
use crate::database::{Collection, Database};
use crate::error::DatabaseError;
use crate::notification::{Notification, NotificationSource, StoredNotification};

/// Provider-side notification operations.
///
/// Cheap to clone; clones share the collection and the listener slot.
#[derive(Clone)]
pub struct NotificationCenter {
    notifications: Collection<StoredNotification>,
    listener: Arc<RwLock<Arc<dyn NotificationCenterListener>>>,
}

impl NotificationCenter {
    /// Build a center over an initialized database. Events go to a
    /// [`LogListener`] until [`set_listener`](Self::set_listener) is called.
    pub fn new(database: &Database) -> Result<Self, DatabaseError> {
        Ok(Self {
            notifications: database.get::<StoredNotification>()?,
            listener: Arc::new(RwLock::new(Arc::new(LogListener))),
        })
    }

    /// Replace the event listener. The last registration wins.
    pub fn set_listener(&self, listener: Arc<dyn NotificationCenterListener>) {
        match self.listener.write() {
            Ok(mut slot) => *slot = listener,
            Err(poisoned) => *poisoned.into_inner() = listener,
        }
    }

    fn listener(&self) -> Arc<dyn NotificationCenterListener> {
        match self.listener.read() {
            Ok(slot) => Arc::clone(&slot),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Store a notification raised by `source`, replacing an earlier one with
    /// the same application-scoped id.
    pub async fn create(
        &self,
        source: NotificationSource,
        notification: Notification,
    ) -> Result<StoredNotification, DatabaseError> {
        let stored = StoredNotification::new(source, notification);
        self.notifications.upsert(&stored).await?;
        self.listener().notification_created(&stored);
        Ok(stored)
    }

    /// Remove one notification. Returns false if it was not stored.
    pub async fn clear(
        &self,
        source_uuid: &str,
        notification_id: &str,
    ) -> Result<bool, DatabaseError> {
        let id = StoredNotification::store_id(source_uuid, notification_id);
        let Some(stored) = self.notifications.get(&id).await? else {
            return Ok(false);
        };

        let removed = self.notifications.delete(&id).await?;
        if removed {
            self.listener().notification_cleared(&stored);
        }
        Ok(removed)
    }

    /// Every stored notification.
    pub async fn fetch_all(&self) -> Result<Vec<StoredNotification>, DatabaseError> {
        self.notifications.get_all().await
    }

    /// Notifications raised by the application with `source_uuid`.
    pub async fn fetch_app(
        &self,
        source_uuid: &str,
    ) -> Result<Vec<StoredNotification>, DatabaseError> {
        let all = self.notifications.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|stored| stored.source.uuid == source_uuid)
            .collect())
    }

    /// Remove every notification raised by `source_uuid`.
    pub async fn clear_app(&self, source_uuid: &str) -> Result<usize, DatabaseError> {
        let ids: Vec<String> = self
            .fetch_app(source_uuid)
            .await?
            .into_iter()
            .map(|stored| stored.id)
            .collect();

        let removed = self.notifications.delete_many(&ids).await?;
        self.listener().app_notifications_cleared(source_uuid, removed);
        Ok(removed)
    }

    /// Remove every notification whose expiry is at or before `now` (epoch
    /// milliseconds), reporting each one as cleared.
    pub async fn clear_expired(&self, now: i64) -> Result<usize, DatabaseError> {
        let expired: Vec<StoredNotification> = self
            .notifications
            .get_all()
            .await?
            .into_iter()
            .filter(|stored| stored.notification.is_expired(now))
            .collect();
        if expired.is_empty() {
            return Ok(0);
        }

        let ids: Vec<&str> = expired.iter().map(|stored| stored.id.as_str()).collect();
        let removed = self.notifications.delete_many(&ids).await?;

        let listener = self.listener();
        for stored in &expired {
            listener.notification_cleared(stored);
        }
        Ok(removed)
    }

    /// Remove every stored notification.
    pub async fn clear_all(&self) -> Result<usize, DatabaseError> {
        let ids: Vec<String> = self
            .notifications
            .get_all()
            .await?
            .into_iter()
            .map(|stored| stored.id)
            .collect();

        let removed = self.notifications.delete_many(&ids).await?;
        self.listener().all_notifications_cleared(removed);
        Ok(removed)
    }
}
