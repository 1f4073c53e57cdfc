//! # Snippetbox Core
//!
//! Domain types and data-access traits shared by every Snippetbox crate.
//!
//! The web layer never talks to a database directly. It depends on the
//! capabilities defined in [`providers`], which have a `PostgreSQL`
//! implementation (`snippetbox-postgres`) and in-memory doubles
//! (`snippetbox-testing`).
//!
//! ## Modules
//!
//! - [`models`]: `Snippet`, `User`, `UserId`
//! - [`providers`]: `SnippetRepository`, `UserRepository`
//! - [`environment`]: `Clock` abstraction for deterministic time
//! - [`validator`]: field-level form validation
//! - [`error`]: `ModelError`

#![forbid(unsafe_code)]

pub mod environment;
pub mod error;
pub mod models;
pub mod providers;
pub mod validator;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use environment::{Clock, SystemClock};
pub use error::{ModelError, Result};
pub use models::{Snippet, User, UserId};
pub use providers::{SnippetRepository, UserRepository};
pub use validator::Validator;
