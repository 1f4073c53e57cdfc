//! Error types for session storage and credential handling.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failures of the authentication primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Session storage backend failed.
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Session data could not be encoded or decoded.
    #[error("Session serialization error: {0}")]
    Serialization(String),

    /// Password hashing failed.
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Internal error (should not be exposed to users).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<AuthError> for snippetbox_core::ModelError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::PasswordHash(msg) => Self::PasswordHash(msg),
            other => Self::Database(other.to_string()),
        }
    }
}
