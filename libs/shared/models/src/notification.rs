use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A toast-style message. Fire-and-forget: nothing acknowledges it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { message: message.into(), level: NotificationLevel::Success }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), level: NotificationLevel::Error }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { message: message.into(), level: NotificationLevel::Info }
    }
}
