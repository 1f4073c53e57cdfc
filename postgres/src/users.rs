//! `PostgreSQL` user repository.

use async_trait::async_trait;
use snippetbox_auth::password;
use snippetbox_core::{ModelError, Result, User, UserId, UserRepository};
use sqlx::{PgPool, Row};

/// Constraint guarding against two accounts sharing an email address.
const UNIQUE_EMAIL_CONSTRAINT: &str = "users_uc_email";

/// User storage backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Argon2 is CPU bound; keep it off the async workers.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> snippetbox_auth::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ModelError::PasswordHash(e.to_string()))?
        .map_err(ModelError::from)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let plaintext = password.to_string();
        let hashed = blocking(move || password::hash_password(&plaintext)).await?;

        sqlx::query(
            r"
            INSERT INTO users (name, email, hashed_password, created)
            VALUES ($1, $2, $3, now())
            ",
        )
        .bind(name)
        .bind(email)
        .bind(hashed)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(UNIQUE_EMAIL_CONSTRAINT)
                {
                    return ModelError::DuplicateEmail;
                }
            }
            ModelError::Database(format!("Failed to insert user: {e}"))
        })?;

        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<UserId> {
        let row = sqlx::query("SELECT id, hashed_password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ModelError::Database(format!("Failed to look up user: {e}")))?
            .ok_or(ModelError::InvalidCredentials)?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| ModelError::Database(e.to_string()))?;
        let hashed: String = row
            .try_get("hashed_password")
            .map_err(|e| ModelError::Database(e.to_string()))?;

        let plaintext = password.to_string();
        let matches = blocking(move || password::verify_password(&plaintext, &hashed)).await?;
        if !matches {
            return Err(ModelError::InvalidCredentials);
        }

        Ok(UserId(id))
    }

    async fn get(&self, id: UserId) -> Result<User> {
        let row = sqlx::query(
            "SELECT id, name, email, hashed_password, created FROM users WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ModelError::Database(format!("Failed to get user: {e}")))?
        .ok_or(ModelError::NotFound)?;

        let decode = |e: sqlx::Error| ModelError::Database(format!("Failed to decode user: {e}"));
        Ok(User {
            id: UserId(row.try_get("id").map_err(decode)?),
            name: row.try_get("name").map_err(decode)?,
            email: row.try_get("email").map_err(decode)?,
            hashed_password: row.try_get("hashed_password").map_err(decode)?,
            created: row.try_get("created").map_err(decode)?,
        })
    }
}
