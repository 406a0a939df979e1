use tracing::info;

use crate::notification::{NotificationSource, StoredNotification};

/// Receives notification center events.
///
/// One method per event kind; every method defaults to a no-op so listeners
/// implement only what they need.
pub trait NotificationCenterListener: Send + Sync {
    fn notification_created(&self, _notification: &StoredNotification) {}

    fn notification_cleared(&self, _notification: &StoredNotification) {}

    /// `count` is the number of notifications removed for `source`.
    fn app_notifications_cleared(&self, _source_uuid: &str, _count: usize) {}

    fn all_notifications_cleared(&self, _count: usize) {}
}

/// Listener that writes each event to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogListener;

impl NotificationCenterListener for LogListener {
    fn notification_created(&self, notification: &StoredNotification) {
        let NotificationSource { uuid, name } = &notification.source;
        info!(id = %notification.id, source = %uuid, app = %name, "notification created");
    }

    fn notification_cleared(&self, notification: &StoredNotification) {
        info!(id = %notification.id, "notification cleared");
    }

    fn app_notifications_cleared(&self, source_uuid: &str, count: usize) {
        info!(source = %source_uuid, count, "app notifications cleared");
    }

    fn all_notifications_cleared(&self, count: usize) {
        info!(count, "all notifications cleared");
    }
}
