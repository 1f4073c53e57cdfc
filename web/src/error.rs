//! Error types for web handlers.
//!
//! This module bridges domain errors and HTTP responses. Client errors carry
//! a short plain-text message; server errors always render the generic
//! `Internal Server Error` body and keep the detail in the logs.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use snippetbox_auth::AuthError;
use snippetbox_core::ModelError;
use std::fmt;

use crate::templates::TemplateError;

/// Error returned by handlers and pipeline stages.
///
/// Repository, session and template failures convert into it with `?`.
///
/// # Examples
///
/// ```ignore
/// async fn handler(Path(id): Path<i64>) -> Result<Response, AppError> {
///     let snippet = state.snippets.get(id).await?; // NotFound becomes 404
///     Ok(render(snippet))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    /// Response body for 4xx; log-only description for 5xx.
    message: String,
    /// Underlying failure, logged and never sent.
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            source: None,
        }
    }

    /// Create an error whose message is the status' canonical reason.
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self::new(
            status,
            status.canonical_reason().unwrap_or("Error").to_string(),
        )
    }

    /// Attach the underlying failure for the log.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request() -> Self {
        Self::status(StatusCode::BAD_REQUEST)
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found() -> Self {
        Self::status(StatusCode::NOT_FOUND)
    }

    /// Create a 413 Payload Too Large error.
    #[must_use]
    pub fn payload_too_large() -> Self {
        Self::status(StatusCode::PAYLOAD_TOO_LARGE)
    }

    /// Create a 500 Internal Server Error with a logged description.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    error = ?source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    "Internal server error"
                );
            }
            self.status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string()
        } else {
            self.message
        };

        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

/// Repository errors. Only "not found" is a client error; the rest are bugs
/// or outages that handlers did not handle explicitly.
impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NotFound => Self::not_found(),
            other => Self::internal("Repository error").with_source(other.into()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self::internal("Session error").with_source(err.into())
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        Self::internal("Template error").with_source(err.into())
    }
}
