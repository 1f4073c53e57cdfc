//! # Snippetbox Authentication Primitives
//!
//! Building blocks used by the web pipeline to track who is making a request
//! and to reject forged form submissions.
//!
//! ## Features
//!
//! - **Session records**: opaque random tokens mapped to typed session data
//! - **Pluggable storage**: the [`SessionStore`] trait (`PostgreSQL` in
//!   production, [`mocks::MockSessionStore`] in tests)
//! - **CSRF tokens**: per-session secrets compared in constant time
//! - **Password hashing**: Argon2id PHC strings
//!
//! ## Example
//!
//! ```
//! use snippetbox_auth::{csrf, SessionRecord};
//! use chrono::{Duration, Utc};
//!
//! let mut record = SessionRecord::new(Utc::now() + Duration::hours(12));
//! let token = record.data.csrf_token.get_or_insert_with(csrf::generate_token).clone();
//! assert!(csrf::verify(&token, Some(&token)));
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod constants;
pub mod csrf;
pub mod error;
pub mod password;
pub mod providers;
pub mod session;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use error::{AuthError, Result};
pub use providers::SessionStore;
pub use session::{SessionData, SessionRecord, SessionToken};
