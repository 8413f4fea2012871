//! Data models for the application
//!
//! Student records as the server returns them, the editable form state built
//! from them, auth payloads and local file blobs selected for upload.

mod auth;
mod file;
mod student;

pub use auth::*;
pub use file::*;
pub use student::*;
