//! In-memory repository implementations.
//!
//! Fast, deterministic stand-ins for the `PostgreSQL` repositories:
//! - [`MockSnippetRepository`]: snippet storage with clock-driven expiry
//! - [`MockUserRepository`]: user accounts with real Argon2 hashes

#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use async_trait::async_trait;
use snippetbox_auth::password;
use snippetbox_core::environment::Clock;
use snippetbox_core::models::LATEST_SNIPPETS_LIMIT;
use snippetbox_core::{ModelError, Result, Snippet, SnippetRepository, User, UserId, UserRepository};
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory snippet repository.
///
/// Ids are assigned sequentially from 1. Expiry is evaluated against the
/// injected [`Clock`], so tests can move time forward.
///
/// # Example
///
/// ```
/// use snippetbox_testing::{MockSnippetRepository, test_clock};
/// use snippetbox_core::SnippetRepository;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = MockSnippetRepository::new(Arc::new(test_clock()));
/// let id = repo.insert("title", "content", 365).await?;
/// assert_eq!(repo.get(id).await?.title, "title");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MockSnippetRepository {
    snippets: Arc<RwLock<Vec<Snippet>>>,
    clock: Arc<dyn Clock>,
    failure: Arc<RwLock<Option<ModelError>>>,
}

impl MockSnippetRepository {
    /// Create an empty repository driven by `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            snippets: Arc::new(RwLock::new(Vec::new())),
            clock,
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Make every subsequent call return `error` (or succeed again on `None`).
    pub fn fail_with(&self, error: Option<ModelError>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Number of stored snippets, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snippets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure.read().unwrap_or_else(PoisonError::into_inner).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for MockSnippetRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSnippetRepository")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SnippetRepository for MockSnippetRepository {
    async fn insert(&self, title: &str, content: &str, expires_days: i32) -> Result<i64> {
        self.check_failure()?;
        let created = self.clock.now();
        let mut snippets = self.snippets.write().unwrap_or_else(PoisonError::into_inner);
        let id = snippets.last().map_or(1, |s| s.id + 1);
        snippets.push(Snippet {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created,
            expires: created + chrono::Duration::days(i64::from(expires_days)),
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Snippet> {
        self.check_failure()?;
        let now = self.clock.now();
        self.snippets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|s| s.id == id && !s.is_expired(now))
            .cloned()
            .ok_or(ModelError::NotFound)
    }

    async fn latest(&self) -> Result<Vec<Snippet>> {
        self.check_failure()?;
        let now = self.clock.now();
        Ok(self
            .snippets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .filter(|s| !s.is_expired(now))
            .take(LATEST_SNIPPETS_LIMIT)
            .cloned()
            .collect())
    }
}

/// In-memory user repository.
///
/// Passwords are hashed with the production Argon2 settings so
/// authentication behaves exactly as it does against `PostgreSQL`.
#[derive(Clone)]
pub struct MockUserRepository {
    users: Arc<RwLock<Vec<User>>>,
    clock: Arc<dyn Clock>,
}

impl MockUserRepository {
    /// Create an empty repository driven by `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
            clock,
        }
    }

    /// Remove a user, leaving any session that references it dangling.
    pub fn remove(&self, id: UserId) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|u| u.id != id);
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no user has signed up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for MockUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockUserRepository")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let hashed_password = password::hash_password(password)?;
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.iter().any(|u| u.email == email) {
            return Err(ModelError::DuplicateEmail);
        }
        let id = UserId(users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1);
        users.push(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            hashed_password,
            created: self.clock.now(),
        });
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<UserId> {
        let user = self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(ModelError::InvalidCredentials)?;

        if password::verify_password(password, &user.hashed_password)? {
            Ok(user.id)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    async fn get(&self, id: UserId) -> Result<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ModelError::NotFound)
    }
}
