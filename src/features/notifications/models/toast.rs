use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToastType {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

/// Transient notification shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ToastType,
    pub title: String,
    pub message: String,
    /// Milliseconds until the toast dismisses itself
    pub duration: u64,
    pub created_at: DateTime<Utc>,
}

/// Data for raising a toast
#[derive(Debug, Clone)]
pub struct NewToast {
    pub kind: ToastType,
    pub title: String,
    pub message: String,
    /// `None` or zero falls back to the configured default
    pub duration: Option<u64>,
}

impl NewToast {
    pub fn new(kind: ToastType, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            duration: None,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastType::Success, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastType::Info, title, message)
    }

    pub fn with_duration(mut self, millis: u64) -> Self {
        self.duration = Some(millis);
        self
    }
}
