use super::{SessionRecord, SessionStore};
use crate::error::SessionError;
use async_trait::async_trait;
use dashmap::DashMap;

/// Process-local session store for development and tests
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: DashMap<String, SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find(&self, token: &str) -> Result<Option<SessionRecord>, SessionError> {
        Ok(self
            .records
            .get(token)
            .filter(|record| !record.is_expired())
            .map(|record| record.clone()))
    }

    async fn commit(&self, token: &str, record: &SessionRecord) -> Result<(), SessionError> {
        self.records.insert(token.to_string(), record.clone());
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        self.records.remove(token);
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, SessionError> {
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired());
        Ok(u64::try_from(before.saturating_sub(self.records.len())).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;

    fn record(offset: Duration) -> SessionRecord {
        SessionRecord {
            values: HashMap::new(),
            deadline: Utc::now() + offset,
        }
    }

    #[tokio::test]
    async fn expired_records_are_invisible() {
        let store = MemorySessionStore::new();
        store.commit("old", &record(Duration::seconds(-1))).await.unwrap();
        assert!(store.find("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cleanup_removes_only_expired() {
        let store = MemorySessionStore::new();
        store.commit("old", &record(Duration::seconds(-1))).await.unwrap();
        store.commit("live", &record(Duration::hours(1))).await.unwrap();

        assert_eq!(store.cleanup_expired().await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.find("live").await.unwrap().is_some());
    }
}
