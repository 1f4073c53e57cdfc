//! Application state for Axum handlers.
//!
//! Built once at startup and cloned cheaply into every stage and handler.
//! Nothing in it is mutable; per-request data lives in request extensions.

use snippetbox_auth::SessionStore;
use snippetbox_core::{Clock, SnippetRepository, UserRepository};
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::templates::TemplateCache;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Snippet storage.
    pub snippets: Arc<dyn SnippetRepository>,
    /// User accounts.
    pub users: Arc<dyn UserRepository>,
    /// Server-side session records.
    pub sessions: Arc<dyn SessionStore>,
    /// Compiled page templates.
    pub templates: Arc<TemplateCache>,
    /// Session cookie attributes.
    pub session_config: Arc<SessionConfig>,
    /// Time source for session expiry and template data.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Assemble the state from its collaborators.
    #[must_use]
    pub fn new(
        snippets: Arc<dyn SnippetRepository>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        templates: Arc<TemplateCache>,
        session_config: SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            snippets,
            users,
            sessions,
            templates,
            session_config: Arc::new(session_config),
            clock,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session_config", &self.session_config)
            .finish_non_exhaustive()
    }
}
