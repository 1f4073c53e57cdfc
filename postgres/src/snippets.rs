//! `PostgreSQL` snippet repository.

use async_trait::async_trait;
use snippetbox_core::models::LATEST_SNIPPETS_LIMIT;
use snippetbox_core::{ModelError, Result, Snippet, SnippetRepository};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// Snippet storage backed by the `snippets` table.
///
/// Expiry is computed by the database clock so `created` and `expires` share
/// one time source.
#[derive(Debug, Clone)]
pub struct PostgresSnippetRepository {
    pool: PgPool,
}

impl PostgresSnippetRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn snippet_from_row(row: &PgRow) -> std::result::Result<Snippet, sqlx::Error> {
    Ok(Snippet {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created: row.try_get("created")?,
        expires: row.try_get("expires")?,
    })
}

fn database_error(context: &str, e: &sqlx::Error) -> ModelError {
    ModelError::Database(format!("{context}: {e}"))
}

#[async_trait]
impl SnippetRepository for PostgresSnippetRepository {
    async fn insert(&self, title: &str, content: &str, expires_days: i32) -> Result<i64> {
        let row = sqlx::query(
            r"
            INSERT INTO snippets (title, content, created, expires)
            VALUES ($1, $2, now(), now() + make_interval(days => $3))
            RETURNING id
            ",
        )
        .bind(title)
        .bind(content)
        .bind(expires_days)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("Failed to insert snippet", &e))?;

        row.try_get("id")
            .map_err(|e| database_error("Failed to read snippet id", &e))
    }

    async fn get(&self, id: i64) -> Result<Snippet> {
        let row = sqlx::query(
            r"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > now() AND id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to get snippet", &e))?
        .ok_or(ModelError::NotFound)?;

        snippet_from_row(&row).map_err(|e| database_error("Failed to decode snippet", &e))
    }

    #[allow(clippy::cast_possible_wrap)] // Limit is a small constant
    async fn latest(&self) -> Result<Vec<Snippet>> {
        let rows = sqlx::query(
            r"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > now()
            ORDER BY id DESC
            LIMIT $1
            ",
        )
        .bind(LATEST_SNIPPETS_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to list snippets", &e))?;

        rows.iter()
            .map(snippet_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| database_error("Failed to decode snippet", &e))
    }
}
