//! Error types module
//!
//! Every failure a controller can observe is a `ClientError`. Validation errors
//! never reach the network; the remaining variants come from the server or the
//! transport and are turned into user-facing notifications at the call site.

use crate::attachments::AttachmentError;
use crate::validation::FieldErrors;

/// Shown when a failed request carries no usable server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues reported by the server
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented and logged.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same action may succeed
    fn is_recoverable(&self) -> bool;

    /// User-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Conflict on {field}: {message}")]
    Conflict { field: String, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server responded with status {status}")]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("No student form is open")]
    FormClosed,

    #[error("Session store error: {0}")]
    Session(String),
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        ClientError::Validation(errors)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(format!("JSON parsing error: {}", err))
    }
}

impl ClientError {
    /// Message carried by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            ClientError::Conflict { message, .. } => Some(message),
            ClientError::Auth(message) => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field the server message refers to, by substring match on "email" / "mobile".
    ///
    /// The server reports duplicates only as free text, so this is the whole contract.
    pub fn conflict_field(message: &str) -> Option<&'static str> {
        let lower = message.to_lowercase();
        if lower.contains("email") {
            Some("email")
        } else if lower.contains("mobile") {
            Some("mobile")
        } else {
            None
        }
    }
}

/// Static metadata per variant: (error_code, recoverable, log_level).
fn client_error_static_metadata(err: &ClientError) -> (&'static str, bool, LogLevel) {
    match err {
        ClientError::Validation(_) => ("VALIDATION_ERROR", true, LogLevel::Debug),
        ClientError::Conflict { .. } => ("CONFLICT", true, LogLevel::Warn),
        ClientError::Auth(_) => ("AUTH_ERROR", true, LogLevel::Warn),
        ClientError::Transport(_) => ("TRANSPORT_ERROR", true, LogLevel::Error),
        ClientError::Server { .. } => ("SERVER_ERROR", true, LogLevel::Warn),
        ClientError::InvalidResponse(_) => ("INVALID_RESPONSE", false, LogLevel::Error),
        ClientError::Attachment(_) => ("ATTACHMENT_REJECTED", true, LogLevel::Debug),
        ClientError::SubmissionInFlight => ("SUBMISSION_IN_FLIGHT", true, LogLevel::Debug),
        ClientError::FormClosed => ("FORM_CLOSED", false, LogLevel::Debug),
        ClientError::Session(_) => ("SESSION_ERROR", false, LogLevel::Error),
    }
}

impl ErrorMetadata for ClientError {
    fn error_code(&self) -> &'static str {
        client_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        client_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            ClientError::Validation(errors) => errors.summary(),
            ClientError::Conflict { message, .. } => message.clone(),
            ClientError::Auth(message) => message.clone(),
            ClientError::Transport(_) => "An error occurred. Please try again.".to_string(),
            ClientError::Server { .. } => self
                .server_message()
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string(),
            ClientError::InvalidResponse(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            ClientError::Attachment(err) => err.to_string(),
            ClientError::SubmissionInFlight => "Please wait, still saving...".to_string(),
            ClientError::FormClosed => "No student form is open".to_string(),
            ClientError::Session(_) => "Could not access the saved session".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        client_error_static_metadata(self).2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldErrorKind;

    #[test]
    fn test_error_metadata_server_with_message() {
        let err = ClientError::Server {
            status: 404,
            message: Some("Student not found".to_string()),
        };
        assert_eq!(err.error_code(), "SERVER_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Student not found");
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_error_metadata_server_without_message() {
        let err = ClientError::Server {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(err.server_message(), None);
        assert_eq!(err.client_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_error_metadata_transport() {
        let err = ClientError::Transport("connection refused".to_string());
        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
        assert_eq!(err.log_level(), LogLevel::Error);
        assert_eq!(err.server_message(), None);
        assert_eq!(err.client_message(), "An error occurred. Please try again.");
    }

    #[test]
    fn test_error_metadata_validation() {
        let mut errors = FieldErrors::new();
        errors.add("name", FieldErrorKind::MissingField, "Name is required");
        let err = ClientError::from(errors);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert_eq!(
            err.client_message(),
            "Please fill in all required fields: name"
        );
    }

    #[test]
    fn test_conflict_field_matching() {
        assert_eq!(
            ClientError::conflict_field("Email already registered"),
            Some("email")
        );
        assert_eq!(
            ClientError::conflict_field("This MOBILE number exists"),
            Some("mobile")
        );
        assert_eq!(ClientError::conflict_field("Server exploded"), None);
    }

    #[test]
    fn test_attachment_error_converts() {
        let err: ClientError = AttachmentError::IndexOutOfRange { index: 3, len: 1 }.into();
        assert_eq!(err.error_code(), "ATTACHMENT_REJECTED");
        assert_eq!(
            err.client_message(),
            "No new document at index 3 (1 selected)"
        );
    }
}
