//! Persistence of linked bank credentials.
//!
//! One credential per user. The `access_tokens.user_id` column is unique and
//! `create` upserts, so concurrent exchanges for the same user leave a single
//! row holding the last written token.

use async_trait::async_trait;

use crate::db::DbPool;
use crate::models::access_token::{AccessCredential, NewAccessCredential};

/// Repository interface for linked bank credentials.
///
/// Pure persistence; authorization and validation happen in the caller.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Find the credential stored for `user_id`.
    ///
    /// Returns the row with the lowest id if more than one exists.
    async fn find(&self, user_id: &str) -> Result<Option<AccessCredential>, sqlx::Error>;

    /// Store a credential, replacing any existing one for the same user.
    async fn create(&self, credential: NewAccessCredential)
    -> Result<AccessCredential, sqlx::Error>;

    /// Delete a stored credential.
    async fn delete(&self, credential: &AccessCredential) -> Result<(), sqlx::Error>;

    /// Verify the backing store is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed repository over the `access_tokens` table.
#[derive(Debug, Clone)]
pub struct PgTokenRepository {
    pool: DbPool,
}

impl PgTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn find(&self, user_id: &str) -> Result<Option<AccessCredential>, sqlx::Error> {
        sqlx::query_as::<_, AccessCredential>(
            r#"
            SELECT id, user_id, access_token, item_id
            FROM access_tokens
            WHERE user_id = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create(
        &self,
        credential: NewAccessCredential,
    ) -> Result<AccessCredential, sqlx::Error> {
        // Single statement; the unique constraint on user_id serializes racing exchanges
        sqlx::query_as::<_, AccessCredential>(
            r#"
            INSERT INTO access_tokens (user_id, access_token, item_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET access_token = EXCLUDED.access_token,
                item_id = EXCLUDED.item_id
            RETURNING id, user_id, access_token, item_id
            "#,
        )
        .bind(&credential.user_id)
        .bind(&credential.access_token)
        .bind(&credential.item_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete(&self, credential: &AccessCredential) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM access_tokens WHERE id = $1")
            .bind(credential.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;

        Ok(())
    }
}
