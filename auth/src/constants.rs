//! Authentication constants.

use std::time::Duration;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Idle lifetime of a session (12 hours).
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(12 * 60 * 60);

/// Hidden form field carrying the CSRF token.
pub const CSRF_FORM_FIELD: &str = "csrf_token";

/// Header accepted as an alternative to [`CSRF_FORM_FIELD`].
pub const CSRF_HEADER_NAME: &str = "X-CSRF-Token";

/// Number of random bytes in session and CSRF tokens.
pub const TOKEN_BYTES: usize = 32;
