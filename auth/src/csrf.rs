//! CSRF token generation and verification.
//!
//! Tokens are per-session random secrets embedded in every form. A state
//! changing request is accepted only when the submitted value matches the
//! session's token.

use constant_time_eq::constant_time_eq;

use crate::session::random_token;

pub use crate::constants::{CSRF_FORM_FIELD, CSRF_HEADER_NAME};

/// Generate a new CSRF token.
#[must_use]
pub fn generate_token() -> String {
    random_token()
}

/// Compare a submitted token against the session's token.
///
/// Missing or empty submissions never match.
#[must_use]
pub fn verify(expected: &str, submitted: Option<&str>) -> bool {
    match submitted {
        Some(submitted) if !submitted.is_empty() && !expected.is_empty() => {
            constant_time_eq(expected.as_bytes(), submitted.as_bytes())
        }
        _ => false,
    }
}
