use crate::context::RequestIdentity;
use crate::session::{is_static_asset, Session, AUTHENTICATED_USER_ID};
use auth_identity::IdentityStore;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Derives the [`RequestIdentity`] of a request from its session
#[derive(Clone)]
pub struct AuthResolver {
    identities: Arc<dyn IdentityStore>,
    admin_email: Arc<str>,
}

impl AuthResolver {
    pub fn new(identities: Arc<dyn IdentityStore>, admin_email: &str) -> Self {
        Self {
            identities,
            admin_email: Arc::from(admin_email),
        }
    }

    /// Never fails: anything short of a live identity is anonymous
    pub async fn resolve(&self, session: &Session) -> RequestIdentity {
        let user_id = match session.get_i64(AUTHENTICATED_USER_ID) {
            Some(id) if id != 0 => id,
            _ => return RequestIdentity::anonymous(),
        };

        match self.identities.find_by_id(user_id).await {
            Ok(Some(identity)) => RequestIdentity::resolved(identity, &self.admin_email),
            Ok(None) => {
                tracing::debug!(user_id, "Session references a missing identity");
                RequestIdentity::anonymous()
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Identity lookup failed, treating request as anonymous");
                RequestIdentity::anonymous()
            }
        }
    }
}

/// Middleware attaching a [`RequestIdentity`] to every non-static request
pub async fn authenticate(
    State(resolver): State<AuthResolver>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_static_asset(&request) {
        return next.run(request).await;
    }

    let session = request.extensions().get::<Session>().cloned();
    let identity = match session {
        Some(session) => resolver.resolve(&session).await,
        None => RequestIdentity::anonymous(),
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TrustLevel;
    use crate::session::MemorySessionStore;
    use async_trait::async_trait;
    use auth_identity::{Identity, IdentityError, InMemoryIdentityStore};

    struct BrokenStore;

    #[async_trait]
    impl IdentityStore for BrokenStore {
        async fn find_by_email(&self, _email: &str) -> auth_identity::Result<Option<Identity>> {
            Err(IdentityError::DatabaseError(sqlx::Error::PoolTimedOut))
        }
        async fn find_by_id(&self, _id: i64) -> auth_identity::Result<Option<Identity>> {
            Err(IdentityError::DatabaseError(sqlx::Error::PoolTimedOut))
        }
        async fn create(&self, _email: &str, _name: &str) -> auth_identity::Result<Identity> {
            Err(IdentityError::DatabaseError(sqlx::Error::PoolTimedOut))
        }
        async fn delete(&self, _id: i64) -> auth_identity::Result<()> {
            Err(IdentityError::DatabaseError(sqlx::Error::PoolTimedOut))
        }
    }

    fn session() -> Session {
        Session::new(Arc::new(MemorySessionStore::new()), chrono::Duration::hours(12))
    }

    #[tokio::test]
    async fn missing_user_id_is_anonymous() {
        let resolver = AuthResolver::new(Arc::new(InMemoryIdentityStore::new()), "owner@example.com");
        assert_eq!(resolver.resolve(&session()).await, RequestIdentity::anonymous());
    }

    #[tokio::test]
    async fn zero_user_id_is_anonymous() {
        let resolver = AuthResolver::new(Arc::new(InMemoryIdentityStore::new()), "owner@example.com");
        let session = session();
        session.put(AUTHENTICATED_USER_ID, 0);
        assert_eq!(resolver.resolve(&session).await.trust_level(), TrustLevel::Anonymous);
    }

    #[tokio::test]
    async fn live_reference_resolves_with_admin_flag() {
        let store = Arc::new(InMemoryIdentityStore::new());
        let owner = store.create("owner@example.com", "Owner").await.unwrap();
        let resolver = AuthResolver::new(store, "owner@example.com");
        let session = session();
        session.put(AUTHENTICATED_USER_ID, owner.id);

        let ctx = resolver.resolve(&session).await;
        assert_eq!(ctx.trust_level(), TrustLevel::Administrator);
        assert_eq!(ctx.identity(), Some(&owner));
    }

    #[tokio::test]
    async fn stale_reference_degrades_to_anonymous() {
        let store = Arc::new(InMemoryIdentityStore::new());
        let gone = store.create("gone@example.com", "Gone").await.unwrap();
        store.delete(gone.id).await.unwrap();
        let resolver = AuthResolver::new(store, "owner@example.com");
        let session = session();
        session.put(AUTHENTICATED_USER_ID, gone.id);

        assert_eq!(resolver.resolve(&session).await, RequestIdentity::anonymous());
    }

    #[tokio::test]
    async fn store_failure_degrades_to_anonymous() {
        let resolver = AuthResolver::new(Arc::new(BrokenStore), "owner@example.com");
        let session = session();
        session.put(AUTHENTICATED_USER_ID, 5);

        assert_eq!(resolver.resolve(&session).await, RequestIdentity::anonymous());
    }
}
