//! Notification records as stored by the notification center.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Record;

/// Identity of the application that raised a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationSource {
    pub uuid: String,
    pub name: String,
}

impl NotificationSource {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}

/// A button shown on a notification card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonOptions {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Opaque payload handed back to the application when clicked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<Value>,
}

/// The display payload of a notification, as supplied by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Application-scoped id.
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub custom_data: Value,
    /// Creation time, epoch milliseconds.
    pub date: i64,
    /// Expiry time, epoch milliseconds.
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub buttons: Vec<ButtonOptions>,
    #[serde(default)]
    pub on_select: Option<Value>,
    #[serde(default)]
    pub on_expire: Option<Value>,
    #[serde(default)]
    pub on_close: Option<Value>,
}

impl Notification {
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            subtitle: String::new(),
            icon: String::new(),
            category: String::new(),
            custom_data: Value::Object(Default::default()),
            date,
            expires: None,
            buttons: Vec::new(),
            on_select: None,
            on_expire: None,
            on_close: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_expiry(mut self, expires: i64) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Whether the notification has expired at `now` (epoch milliseconds).
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }
}

/// A notification as persisted: the payload plus the application that
/// raised it, keyed by a store-wide id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = Notifications)]
pub struct StoredNotification {
    #[record(id)]
    pub id: String,
    pub notification: Notification,
    pub source: NotificationSource,
}

impl StoredNotification {
    /// Store id for a notification raised by `source`.
    ///
    /// Application ids are only unique per application, so the source uuid is
    /// part of the key.
    pub fn store_id(source_uuid: &str, notification_id: &str) -> String {
        format!("{}:{}", source_uuid, notification_id)
    }

    pub fn new(source: NotificationSource, notification: Notification) -> Self {
        Self {
            id: Self::store_id(&source.uuid, &notification.id),
            notification,
            source,
        }
    }
}
