use std::sync::Mutex;

use tracing::{error, info};

use shared_models::notification::{Notification, NotificationLevel};

/// Toast/snackbar collaborator. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default notifier for the server: notifications become log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => error!(target: "notifications", "{}", notification.message),
            NotificationLevel::Success | NotificationLevel::Info => {
                info!(target: "notifications", level = ?notification.level, "{}", notification.message)
            }
        }
    }
}

/// Keeps every notification in memory, newest last.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.sent().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification);
        }
    }
}
