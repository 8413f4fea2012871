//! Test helpers for controller unit tests
//!
//! An in-memory backend standing in for the REST API, plus record and file
//! fixtures.

pub mod fixtures;
pub mod mock_backend;

pub use fixtures::*;
pub use mock_backend::MockBackend;
