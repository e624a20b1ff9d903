use crate::{error::*, models::*, repository::IdentityStore};
use async_trait::async_trait;
use sqlx::PgPool;

const SELECT_COLUMNS: &str = "SELECT id, email, created_at, name FROM users";

/// PostgreSQL backed identity store (`users` table)
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                email TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_uc_email UNIQUE (email)
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(&format!("{SELECT_COLUMNS} WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(identity)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(identity)
    }

    async fn create(&self, email: &str, display_name: &str) -> Result<Identity> {
        sqlx::query_as::<_, Identity>(
            "INSERT INTO users (email, name) VALUES ($1, $2) RETURNING id, email, created_at, name",
        )
        .bind(email)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                IdentityError::EmailAlreadyInUse
            }
            other => IdentityError::DatabaseError(other),
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
