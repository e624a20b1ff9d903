use super::{SessionRecord, SessionStore};
use crate::error::SessionError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{types::Json, PgPool};
use std::collections::HashMap;

/// PostgreSQL session store (`sessions` table)
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), SessionError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                data JSONB NOT NULL,
                expiry TIMESTAMPTZ NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS sessions_expiry_idx ON sessions (expiry)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find(&self, token: &str) -> Result<Option<SessionRecord>, SessionError> {
        let row: Option<(Json<HashMap<String, Value>>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT data, expiry FROM sessions WHERE token = $1 AND current_timestamp < expiry",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(values), deadline)| SessionRecord { values, deadline }))
    }

    async fn commit(&self, token: &str, record: &SessionRecord) -> Result<(), SessionError> {
        sqlx::query(
            r"
            INSERT INTO sessions (token, data, expiry) VALUES ($1, $2, $3)
            ON CONFLICT (token) DO UPDATE SET data = EXCLUDED.data, expiry = EXCLUDED.expiry
            ",
        )
        .bind(token)
        .bind(Json(&record.values))
        .bind(record.deadline)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expiry < current_timestamp")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
