//! Error types for the data-access layer.

use thiserror::Error;

/// Result type alias for data-access operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Failures reported by snippet and user repositories.
///
/// The first three variants are expected outcomes that handlers translate
/// into 404s or form errors. The rest are infrastructure failures and end
/// up as 500 responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// No matching (non-expired) record exists.
    #[error("no matching record found")]
    NotFound,

    /// Email/password pair does not match a user.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A user with this email address already exists.
    #[error("duplicate email")]
    DuplicateEmail,

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Password hashing or verification failed.
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl ModelError {
    /// Returns `true` for outcomes caused by the request rather than the system.
    ///
    /// # Examples
    ///
    /// ```
    /// # use snippetbox_core::ModelError;
    /// assert!(ModelError::DuplicateEmail.is_user_error());
    /// assert!(!ModelError::Database("timeout".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::InvalidCredentials | Self::DuplicateEmail
        )
    }
}
