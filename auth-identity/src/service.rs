use crate::{error::*, models::*, repository::*};
use std::sync::Arc;

pub struct IdentityService {
    store: Arc<dyn IdentityStore>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }

    /// Look up an identity by email, creating it on first sign-in
    pub async fn find_or_create(&self, email: &str, display_name: &str) -> Result<Identity> {
        if let Some(identity) = self.store.find_by_email(email).await? {
            return Ok(identity);
        }
        self.create_or_fetch(email, display_name).await
    }

    /// Create an identity for an email that was just looked up and missing.
    ///
    /// Two concurrent first sign-ins for the same email race on the insert;
    /// the loser sees `EmailAlreadyInUse` and re-reads the winner's row, so
    /// both callers get the same identity.
    pub async fn create_or_fetch(&self, email: &str, display_name: &str) -> Result<Identity> {
        match self.store.create(email, display_name).await {
            Ok(identity) => {
                tracing::info!(user_id = identity.id, "Created identity on first sign-in");
                Ok(identity)
            }
            Err(IdentityError::EmailAlreadyInUse) => {
                tracing::debug!("Concurrent sign-in created the identity first");
                self.store
                    .find_by_email(email)
                    .await?
                    .ok_or(IdentityError::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Identity>> {
        self.store.find_by_id(id).await
    }
}
