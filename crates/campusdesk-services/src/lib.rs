//! campusdesk services
//!
//! Controllers behind the signup, login and student screens. Each controller
//! owns its state, talks to the server through the backend traits from
//! `campusdesk-core`, and reports outcomes as notifications instead of
//! propagating network errors.

pub mod auth;
pub mod collection;
pub mod form;
mod inflight;
pub mod notification;
pub mod page;
pub mod roster;

#[cfg(test)]
mod test_helpers;

pub use auth::{logout, AuthOutcome, LoginController, SignupController};
pub use collection::StudentCollection;
pub use form::{FormMode, FormState, StudentFormController, SubmitOutcome};
pub use notification::{Notification, NotificationLevel};
pub use page::StudentPage;
pub use roster::{PageView, RosterController, DEFAULT_PAGE_SIZE};
