//! Mock session store for testing.

use crate::error::{AuthError, Result};
use crate::providers::SessionStore;
use crate::session::{SessionRecord, SessionToken};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Mock session store.
///
/// Uses in-memory storage for testing. Expiry is checked against the
/// instant passed to `load`.
#[derive(Debug, Clone, Default)]
pub struct MockSessionStore {
    sessions: Arc<Mutex<HashMap<SessionToken, SessionRecord>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockSessionStore {
    /// Create a new mock session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionToken, SessionRecord>>> {
        if self.is_failing() {
            return Err(AuthError::Storage("store unavailable".to_string()));
        }
        self.sessions
            .lock()
            .map_err(|_| AuthError::InternalError("Mutex lock failed".to_string()))
    }

    fn is_failing(&self) -> bool {
        self.fail.lock().map(|f| *f).unwrap_or(true)
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut fail) = self.fail.lock() {
            *fail = failing;
        }
    }

    /// Get count of stored sessions (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn session_count(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether a record exists for `token`, expired or not.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn contains(&self, token: &SessionToken) -> Result<bool> {
        Ok(self.lock()?.contains_key(token))
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn load(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>> {
        let sessions = self.lock()?;
        Ok(sessions
            .get(token)
            .filter(|record| !record.is_expired(now))
            .cloned())
    }

    async fn save(&self, record: &SessionRecord) -> Result<()> {
        self.lock()?.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, token: &SessionToken) -> Result<()> {
        self.lock()?.remove(token);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}
