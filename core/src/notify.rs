//! Fire-and-forget user notifications (toasts).

use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
    pub icon: Option<String>,
}

impl Notification {
    pub fn created() -> Self {
        Self {
            level: NotifyLevel::Success,
            message: "Todo is created".to_string(),
            icon: None,
        }
    }

    pub fn deleted() -> Self {
        Self {
            level: NotifyLevel::Info,
            message: "Todo Deleted!".to_string(),
            icon: Some("\u{1f5d1}\u{fe0f}".to_string()),
        }
    }
}

/// Presents a notification. Must not block; the result is never observed.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log instead of the screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        info!(
            level = ?notification.level,
            icon = notification.icon.as_deref().unwrap_or(""),
            "{}",
            notification.message
        );
    }
}
