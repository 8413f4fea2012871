//! campusdesk Core Library
//!
//! This crate provides the domain models, validation rules, attachment bookkeeping,
//! error types, configuration and session store shared by all campusdesk components.

pub mod attachments;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use attachments::{AttachmentError, AttachmentTracker, PhotoAction, SubmissionPayload};
pub use backend::{AuthBackend, StudentBackend};
pub use config::ClientConfig;
pub use error::{ClientError, ErrorMetadata, LogLevel, GENERIC_FAILURE_MESSAGE};
pub use session::{FileSessionStorage, MemorySessionStorage, Session, SessionStorage, SessionStore};
pub use validation::{FieldError, FieldErrorKind, FieldErrors};
