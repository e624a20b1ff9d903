use crate::config::{SessionBackend, Settings};
use crate::render::{TemplateRenderer, PageRenderer};
use auth_gateway::{AuthGateway, MemorySessionStore, PgSessionStore, SessionStore};
use auth_identity::{IdentityStore, InMemoryIdentityStore, PgIdentityStore};
use error_common::{FolioError, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Main Folio server state
#[derive(Clone)]
pub struct FolioServer {
    /// Server configuration
    pub settings: Arc<Settings>,
    /// Sessions, resolver, gates and sign-in
    pub gateway: AuthGateway,
    /// HTML page sink
    pub renderer: Arc<dyn PageRenderer>,
}

impl FolioServer {
    pub fn new(settings: Settings, gateway: AuthGateway, renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            settings: Arc::new(settings),
            gateway,
            renderer,
        }
    }

    /// Connect the configured backends and build the server state
    pub async fn connect(settings: Settings) -> Result<Self> {
        let pool = if settings.dsn.trim().is_empty() {
            None
        } else {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(Duration::from_secs(5))
                .connect(&settings.dsn)
                .await
                .map_err(|e| FolioError::DatabaseError(format!("Failed to connect: {e}")))?;
            tracing::info!("Database connection pool established");
            Some(pool)
        };

        let identities: Arc<dyn IdentityStore> = match &pool {
            Some(pool) => {
                let store = PgIdentityStore::new(pool.clone());
                store
                    .ensure_schema()
                    .await
                    .map_err(|e| FolioError::DatabaseError(e.to_string()))?;
                Arc::new(store)
            }
            None => {
                tracing::warn!("No dsn configured, identities are kept in memory");
                Arc::new(InMemoryIdentityStore::new())
            }
        };

        let sessions = session_store(&settings, pool.as_ref()).await?;

        let gateway = AuthGateway::with_google(settings.gateway.clone(), identities, sessions)
            .map_err(|e| FolioError::InternalError(format!("Failed to build token verifier: {e}")))?;

        Ok(Self::new(settings, gateway, Arc::new(TemplateRenderer)))
    }

    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        self.gateway.sessions.store()
    }
}

async fn session_store(settings: &Settings, pool: Option<&sqlx::PgPool>) -> Result<Arc<dyn SessionStore>> {
    match settings.session_backend {
        SessionBackend::Memory => Ok(Arc::new(MemorySessionStore::new())),
        SessionBackend::Postgres => {
            let pool = pool.ok_or_else(|| FolioError::config("dsn is not provided"))?;
            let store = PgSessionStore::new(pool.clone());
            store
                .ensure_schema()
                .await
                .map_err(|e| FolioError::SessionError(e.to_string()))?;
            Ok(Arc::new(store))
        }
        SessionBackend::Redis => redis_store(settings).await,
    }
}

#[cfg(feature = "redis")]
async fn redis_store(settings: &Settings) -> Result<Arc<dyn SessionStore>> {
    let url = settings
        .redis_url
        .as_deref()
        .ok_or_else(|| FolioError::config("redis_url is required for the redis session backend"))?;
    let store = auth_gateway::RedisSessionStore::connect(url)
        .await
        .map_err(|e| FolioError::SessionError(e.to_string()))?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
async fn redis_store(_settings: &Settings) -> Result<Arc<dyn SessionStore>> {
    Err(FolioError::config(
        "redis session backend requires building with the `redis` feature",
    ))
}

const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Periodically drop expired sessions until the task is aborted
pub fn spawn_session_cleanup(store: Arc<dyn SessionStore>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every.max(MIN_CLEANUP_INTERVAL));
        // The first tick fires immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match store.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Expired sessions removed"),
                Err(e) => tracing::warn!(error = %e, "Session cleanup failed"),
            }
        }
    })
}
