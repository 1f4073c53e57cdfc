//! Session records and tokens.
//!
//! A session is identified by an opaque random token sent to the client in a
//! cookie. Everything else lives server-side in a [`SessionRecord`].

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use snippetbox_core::UserId;
use std::fmt;

use crate::constants::TOKEN_BYTES;

/// Encodes `TOKEN_BYTES` of OS randomness as URL-safe base64.
pub(crate) fn random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Opaque session identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh unpredictable token.
    #[must_use]
    pub fn generate() -> Self {
        Self(random_token())
    }

    /// Wrap a token received from a client cookie.
    #[must_use]
    pub fn from_cookie(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Token as sent in the cookie.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Typed session contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Authenticated user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// One-shot message shown on the next rendered page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,

    /// Per-session CSRF secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,

    /// Path to return to after a successful login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_after_login: Option<String>,
}

impl SessionData {
    /// True when nothing worth persisting is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A session as held by a [`crate::SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Identifier sent to the client.
    pub token: SessionToken,
    /// Session contents.
    pub data: SessionData,
    /// Absolute expiry; the store treats the record as missing afterwards.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Start an empty session with a new token.
    #[must_use]
    pub fn new(expires_at: DateTime<Utc>) -> Self {
        Self {
            token: SessionToken::generate(),
            data: SessionData::default(),
            expires_at,
        }
    }

    /// Whether the record has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
