//! Domain records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snippet expiry windows (in days) accepted by the create form.
pub const PERMITTED_EXPIRY_DAYS: [i32; 3] = [1, 7, 365];

/// Number of snippets shown on the home page.
pub const LATEST_SNIPPETS_LIMIT: usize = 10;

/// A short piece of text with an expiry date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Database identifier (always `>= 1`).
    pub id: i64,
    /// Title, at most 100 characters.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Time after which the snippet is no longer visible.
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// Returns `true` once `now` has reached the expiry time.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

/// User identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: String,
    /// Argon2 PHC string. Never rendered.
    #[serde(skip_serializing)]
    pub hashed_password: String,
    /// Registration time.
    pub created: DateTime<Utc>,
}
