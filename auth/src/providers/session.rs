//! Session store trait.

use crate::error::Result;
use crate::session::{SessionRecord, SessionToken};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Session store.
///
/// This trait abstracts over session storage (`PostgreSQL` in production).
///
/// # Implementation Notes
///
/// - Expired records behave exactly like missing ones
/// - `save` is an upsert keyed by token
/// - Expired rows are removed periodically via [`SessionStore::delete_expired`]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session.
    ///
    /// Expiry is judged against `now` rather than the backend's own clock,
    /// so the caller's time source decides the idle lifetime.
    ///
    /// # Returns
    ///
    /// `None` if the token is unknown or the record expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails or the stored data cannot be decoded.
    async fn load(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>>;

    /// Insert or replace a session.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    async fn save(&self, record: &SessionRecord) -> Result<()>;

    /// Delete a session. Unknown tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    async fn delete(&self, token: &SessionToken) -> Result<()>;

    /// Remove every record that expired before `now`.
    ///
    /// # Returns
    ///
    /// Number of records removed.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}
