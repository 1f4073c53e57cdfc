//! Data-access capabilities.
//!
//! The request pipeline depends only on these traits. Production wiring uses
//! the `PostgreSQL` implementations; tests use the in-memory doubles from
//! `snippetbox-testing`.

use crate::error::Result;
use crate::models::{Snippet, User, UserId};
use async_trait::async_trait;

/// Snippet repository.
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Insert a snippet that expires `expires_days` after creation.
    ///
    /// # Returns
    ///
    /// The new snippet ID.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Database` if the insert fails.
    async fn insert(&self, title: &str, content: &str, expires_days: i32) -> Result<i64>;

    /// Get a non-expired snippet by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Snippet is missing or expired → `ModelError::NotFound`
    async fn get(&self, id: i64) -> Result<Snippet>;

    /// The ten most recently created non-expired snippets, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Database` if the query fails.
    async fn latest(&self) -> Result<Vec<Snippet>>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Register a user. The password is hashed before it is stored.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Email already exists → `ModelError::DuplicateEmail`
    /// - Hashing or the insert fails
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<()>;

    /// Check an email/password pair.
    ///
    /// # Returns
    ///
    /// The matching user's ID.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidCredentials` if the email is unknown or
    /// the password does not match.
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserId>;

    /// Get user by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `ModelError::NotFound`
    async fn get(&self, id: UserId) -> Result<User>;
}
