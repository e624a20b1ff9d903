use crate::{error::*, models::*};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>>;
    /// Fails with [`IdentityError::EmailAlreadyInUse`] when the email exists
    async fn create(&self, email: &str, display_name: &str) -> Result<Identity>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: HashMap<i64, Identity>,
}

/// In-memory implementation for development/testing
#[derive(Default)]
pub struct InMemoryIdentityStore {
    table: Mutex<Table>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.table.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let table = self.table.lock();
        Ok(table.rows.values().find(|row| row.has_email(email)).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>> {
        Ok(self.table.lock().rows.get(&id).cloned())
    }

    async fn create(&self, email: &str, display_name: &str) -> Result<Identity> {
        // Check and insert under one lock, like a UNIQUE constraint
        let mut table = self.table.lock();
        if table.rows.values().any(|row| row.has_email(email)) {
            return Err(IdentityError::EmailAlreadyInUse);
        }

        table.next_id += 1;
        let identity = Identity {
            id: table.next_id,
            email: email.to_string(),
            display_name: display_name.to_string(),
            created_at: Utc::now(),
        };
        table.rows.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.table.lock().rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = InMemoryIdentityStore::new();
        let ada = store.create("ada@example.com", "Ada").await.unwrap();
        let bob = store.create("bob@example.com", "Bob").await.unwrap();
        assert!(bob.id > ada.id);
        assert!(ada.id > 0);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryIdentityStore::new();
        store.create("ada@example.com", "Ada").await.unwrap();
        let err = store.create("ada@example.com", "Ada L").await.unwrap_err();
        assert!(matches!(err, IdentityError::EmailAlreadyInUse));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn delete_leaves_dangling_ids_unresolvable() {
        let store = InMemoryIdentityStore::new();
        let ada = store.create("ada@example.com", "Ada").await.unwrap();
        store.delete(ada.id).await.unwrap();
        assert!(store.find_by_id(ada.id).await.unwrap().is_none());
        assert!(store.find_by_email("ada@example.com").await.unwrap().is_none());
    }
}
