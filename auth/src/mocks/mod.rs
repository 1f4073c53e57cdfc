//! Mock implementations for testing.
//!
//! In-memory providers used by unit and integration tests.

pub mod session;

pub use session::MockSessionStore;
