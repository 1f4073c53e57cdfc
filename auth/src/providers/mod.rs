//! Authentication providers.
//!
//! Traits for the external dependencies of the session layer. The web
//! pipeline holds them as trait objects so production and tests can supply
//! different backends.

pub mod session;

pub use session::SessionStore;
