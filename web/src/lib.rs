//! Snippetbox web application.
//!
//! A server-rendered pastebin: visitors browse and read snippets, signed-up
//! users create them. The interesting part is the request pipeline.
//!
//! # Request Flow
//!
//! ```text
//! request
//!   → recover panic → log request → security headers      (every request)
//!   → load session → verify CSRF → authenticate            (application routes)
//!   → require authentication                               (protected routes)
//!   → handler → template render
//! response
//! ```
//!
//! 1. **Standard stages** wrap everything, including 404s and static files
//! 2. **Session** is loaded from the `session` cookie or created, and saved
//!    with a sliding expiry after the handler ran
//! 3. **CSRF** tokens are checked on every state-changing request before the
//!    handler sees the body
//! 4. **Authentication** turns the session's user id into a
//!    [`RequestContext`]; stale ids count as logged out
//! 5. **Rendering** goes to a buffer first, so a failed render never leaks a
//!    partial page
//!
//! # Example
//!
//! ```ignore
//! use snippetbox_web::{AppState, routes::{Timeouts, build_router}};
//!
//! let state = AppState::new(snippets, users, sessions, templates, session_config, clock);
//! let app = build_router(state, Path::new("./ui/static"), Timeouts::default());
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use config::{Config, SameSitePolicy, SessionConfig};
pub use context::RequestContext;
pub use error::AppError;
pub use extractors::{ClientIp, RequestId};
pub use middleware::{Chain, Stage};
pub use session::Session;
pub use state::AppState;
pub use templates::{TemplateCache, TemplateData, TemplateError};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
