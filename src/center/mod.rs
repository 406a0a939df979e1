//! Notification center - provider-side operations over stored notifications.
//!
//! The center owns the notifications collection and reports every change to
//! a single registered [`NotificationCenterListener`].

#[allow(clippy::module_inception)]
mod center;
mod listener;

pub use center::NotificationCenter;
pub use listener::{LogListener, NotificationCenterListener};
