//! `PostgreSQL` session store.
//!
//! Session data is stored as JSONB keyed by the opaque token. Expired rows
//! are invisible to `load` and removed by a periodic cleanup task.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snippetbox_auth::{AuthError, Result, SessionData, SessionRecord, SessionStore, SessionToken};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Session storage backed by the `sessions` table.
#[derive(Debug, Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(context: &str, e: &sqlx::Error) -> AuthError {
    AuthError::Storage(format!("{context}: {e}"))
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn load(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>> {
        let row = sqlx::query("SELECT data, expiry FROM sessions WHERE token = $1 AND expiry > $2")
            .bind(token.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to load session", &e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Json(data): Json<SessionData> = row
            .try_get("data")
            .map_err(|e| AuthError::Serialization(e.to_string()))?;
        let expires_at: DateTime<Utc> = row
            .try_get("expiry")
            .map_err(|e| storage_error("Failed to decode session", &e))?;

        Ok(Some(SessionRecord {
            token: token.clone(),
            data,
            expires_at,
        }))
    }

    async fn save(&self, record: &SessionRecord) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO sessions (token, data, expiry)
            VALUES ($1, $2, $3)
            ON CONFLICT (token) DO UPDATE SET data = EXCLUDED.data, expiry = EXCLUDED.expiry
            ",
        )
        .bind(record.token.as_str())
        .bind(Json(&record.data))
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to save session", &e))?;

        Ok(())
    }

    async fn delete(&self, token: &SessionToken) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete session", &e))?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expiry <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete expired sessions", &e))?;

        Ok(result.rows_affected())
    }
}

/// Purge period used when the configured one is zero.
pub const DEFAULT_CLEANUP_PERIOD: Duration = Duration::from_secs(300);

fn cleanup_period(period: Duration) -> Duration {
    if period.is_zero() {
        tracing::warn!(
            fallback_secs = DEFAULT_CLEANUP_PERIOD.as_secs(),
            "Session cleanup period must be positive, using the default"
        );
        DEFAULT_CLEANUP_PERIOD
    } else {
        period
    }
}

/// Periodically purge expired sessions from `store`.
///
/// Failures are logged and retried on the next tick. A zero `period` falls
/// back to [`DEFAULT_CLEANUP_PERIOD`]. Abort the returned handle to stop the
/// task.
pub fn spawn_cleanup(store: Arc<dyn SessionStore>, period: Duration) -> JoinHandle<()> {
    let period = cleanup_period(period);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match store.delete_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Session cleanup failed"),
            }
        }
    })
}
