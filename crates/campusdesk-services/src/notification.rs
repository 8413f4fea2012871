use campusdesk_core::{ClientError, ErrorMetadata, LogLevel};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A user-facing message produced by a controller action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.message)
    }
}

/// Log an error at the level its metadata asks for.
pub(crate) fn log_client_error(err: &ClientError, action: &'static str) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(action, code, error = %err, "Action failed"),
        LogLevel::Warn => tracing::warn!(action, code, error = %err, "Action failed"),
        LogLevel::Error => tracing::error!(action, code, error = %err, "Action failed"),
    }
}
