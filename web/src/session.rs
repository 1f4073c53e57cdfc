//! Per-request session handle.
//!
//! The session stage loads (or creates) a [`SessionRecord`], wraps it in a
//! [`Session`] and puts it in the request extensions. Handlers and later
//! stages mutate it through this handle; after the response is produced the
//! stage persists whatever the handle holds.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use snippetbox_auth::{SessionRecord, SessionToken, csrf};
use snippetbox_core::UserId;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AppError;

#[derive(Debug)]
struct SessionInner {
    record: SessionRecord,
    superseded: Option<SessionToken>,
}

/// Shared, mutable view of the current request's session.
///
/// Clones refer to the same session.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionInner>>,
}

impl Session {
    /// Wrap a loaded or freshly created record.
    #[must_use]
    pub fn new(record: SessionRecord) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                record,
                superseded: None,
            })),
        }
    }

    // Poisoned only after a handler panic; the record itself stays valid.
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current token.
    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.lock().record.token.clone()
    }

    /// Authenticated user id stored in the session, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.lock().record.data.user_id
    }

    /// Record `id` as the authenticated user.
    pub fn set_user_id(&self, id: UserId) {
        self.lock().record.data.user_id = Some(id);
    }

    /// Forget the authenticated user.
    pub fn remove_user_id(&self) {
        self.lock().record.data.user_id = None;
    }

    /// CSRF token bound to this session, generated on first use.
    #[must_use]
    pub fn csrf_token(&self) -> String {
        self.lock()
            .record
            .data
            .csrf_token
            .get_or_insert_with(csrf::generate_token)
            .clone()
    }

    /// Store a message for the next rendered page.
    pub fn put_flash(&self, message: impl Into<String>) {
        self.lock().record.data.flash = Some(message.into());
    }

    /// Take the flash message, clearing it.
    #[must_use]
    pub fn pop_flash(&self) -> Option<String> {
        self.lock().record.data.flash.take()
    }

    /// Remember where to send the user after logging in.
    pub fn put_redirect(&self, path: impl Into<String>) {
        self.lock().record.data.redirect_after_login = Some(path.into());
    }

    /// Take the post-login redirect target, clearing it.
    #[must_use]
    pub fn pop_redirect(&self) -> Option<String> {
        self.lock().record.data.redirect_after_login.take()
    }

    /// Issue a new token for the same data and a new CSRF token.
    ///
    /// Call on every privilege change (login, logout). The old token is
    /// deleted from the store when the response is finalized.
    pub fn renew_token(&self) {
        let mut inner = self.lock();
        let old = std::mem::replace(&mut inner.record.token, SessionToken::generate());
        // Only the token the client originally presented exists in the store.
        if inner.superseded.is_none() {
            inner.superseded = Some(old);
        }
        inner.record.data.csrf_token = Some(csrf::generate_token());
    }

    /// Snapshot of the record and the token it replaced, if renewed.
    #[must_use]
    pub fn snapshot(&self) -> (SessionRecord, Option<SessionToken>) {
        let inner = self.lock();
        (inner.record.clone(), inner.superseded.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::internal("Session middleware not installed"))
    }
}
