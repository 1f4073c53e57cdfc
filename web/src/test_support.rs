//! Shared fixtures for unit tests.

#![allow(clippy::expect_used)] // Test fixtures fail loudly

use chrono::Utc;
use snippetbox_auth::mocks::MockSessionStore;
use snippetbox_testing::{FixedClock, MockSnippetRepository, MockUserRepository};
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::state::AppState;
use crate::templates::TemplateCache;

/// Handles to the in-memory collaborators behind a test [`AppState`].
pub struct Mocks {
    pub snippets: MockSnippetRepository,
    pub users: MockUserRepository,
    pub sessions: MockSessionStore,
    pub clock: FixedClock,
}

/// State backed by mocks, with the clock set to the current time.
pub fn test_state() -> (AppState, Mocks) {
    let clock = FixedClock::new(Utc::now());
    let mocks = Mocks {
        snippets: MockSnippetRepository::new(Arc::new(clock.clone())),
        users: MockUserRepository::new(Arc::new(clock.clone())),
        sessions: MockSessionStore::new(),
        clock,
    };
    let state = AppState::new(
        Arc::new(mocks.snippets.clone()),
        Arc::new(mocks.users.clone()),
        Arc::new(mocks.sessions.clone()),
        Arc::new(TemplateCache::new().expect("built-in templates compile")),
        SessionConfig::default(),
        Arc::new(mocks.clock.clone()),
    );
    (state, mocks)
}
