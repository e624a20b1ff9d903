use super::{SessionRecord, SessionStore};
use crate::error::SessionError;
use ::redis::{aio::ConnectionManager, AsyncCommands};
use async_trait::async_trait;
use chrono::Utc;

const KEY_PREFIX: &str = "session:";

/// Redis session store; expiry is delegated to key TTLs
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str) -> Result<Self, SessionError> {
        let client = ::redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        Ok(Self { redis })
    }

    fn key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn find(&self, token: &str) -> Result<Option<SessionRecord>, SessionError> {
        let mut conn = self.redis.clone();
        let json: Option<String> = conn.get(Self::key(token)).await?;
        match json {
            Some(json) => {
                let record: SessionRecord = serde_json::from_str(&json)?;
                Ok((!record.is_expired()).then_some(record))
            }
            None => Ok(None),
        }
    }

    async fn commit(&self, token: &str, record: &SessionRecord) -> Result<(), SessionError> {
        let ttl = (record.deadline - Utc::now()).num_seconds();
        let Ok(ttl) = u64::try_from(ttl) else {
            // Already expired: nothing worth keeping
            return self.delete(token).await;
        };
        if ttl == 0 {
            return self.delete(token).await;
        }

        let json = serde_json::to_string(record)?;
        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(Self::key(token), json, ttl).await?;
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(Self::key(token)).await?;
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, SessionError> {
        Ok(0)
    }
}
