//! Authentication and authorization gateway for Folio
//!
//! Every request goes through the same ordered pipeline:
//!
//! 1. [`session::load_and_save`] loads the caller's session from its cookie
//! 2. [`resolver::authenticate`] derives a [`RequestIdentity`]
//! 3. [`gate::require_authenticated`] / [`gate::require_admin`] stop
//!    requests that lack the required trust
//! 4. the handler runs
//! 5. the session is committed and the cookie refreshed
//!
//! Sign-in is handled by [`LoginService`], which verifies a Google ID token
//! and binds the identity to the session under a fresh token.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use auth_gateway::{gate, resolver, session, AuthGateway, GatewayConfig, MemorySessionStore};
//! use auth_identity::InMemoryIdentityStore;
//! use axum::{middleware, routing::get, Router};
//!
//! # fn build() -> Result<Router, Box<dyn std::error::Error>> {
//! let config = GatewayConfig::new("owner@example.com", "1234.apps.googleusercontent.com");
//! let gateway = AuthGateway::with_google(
//!     config,
//!     Arc::new(InMemoryIdentityStore::new()),
//!     Arc::new(MemorySessionStore::new()),
//! )?;
//!
//! let app = Router::new()
//!     .route("/admin", get(|| async { "admin only" }))
//!     .route_layer(middleware::from_fn_with_state(gateway.gatekeeper.clone(), gate::require_admin))
//!     .layer(middleware::from_fn_with_state(gateway.resolver.clone(), resolver::authenticate))
//!     .layer(middleware::from_fn_with_state(gateway.sessions.clone(), session::load_and_save));
//! # Ok(app)
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod login;
pub mod resolver;
pub mod session;

pub use config::*;
pub use context::*;
pub use error::*;
pub use gate::{Denial, Gate, Gatekeeper, Outcome};
pub use login::{logout, LoginService, LOGOUT_FLASH};
pub use resolver::AuthResolver;
pub use session::{
    MemorySessionStore, PgSessionStore, Session, SessionManager, SessionRecord, SessionStore,
    AUTHENTICATED_USER_ID, DARK_MODE, FLASH,
};
#[cfg(feature = "redis")]
pub use session::RedisSessionStore;

use auth_identity::IdentityStore;
use auth_oauth::{GoogleTokenInfoClient, OAuthError, TokenVerifier};
use std::sync::Arc;

/// Everything the HTTP layer needs, built from one [`GatewayConfig`]
#[derive(Clone)]
pub struct AuthGateway {
    pub config: Arc<GatewayConfig>,
    pub sessions: SessionManager,
    pub resolver: AuthResolver,
    pub gatekeeper: Gatekeeper,
    pub login: Arc<LoginService>,
}

impl AuthGateway {
    pub fn new(
        config: GatewayConfig,
        identities: Arc<dyn IdentityStore>,
        sessions: Arc<dyn SessionStore>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        let login = LoginService::new(verifier, config.claim_policy(), identities.clone());
        Self {
            sessions: SessionManager::new(sessions, config.session.clone()),
            resolver: AuthResolver::new(identities, &config.admin_email),
            gatekeeper: Gatekeeper::new(&config.not_authorized_path),
            login: Arc::new(login),
            config: Arc::new(config),
        }
    }

    /// Gateway verifying credentials against Google's tokeninfo endpoint
    pub fn with_google(
        config: GatewayConfig,
        identities: Arc<dyn IdentityStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, OAuthError> {
        let verifier = GoogleTokenInfoClient::with_endpoint(
            auth_oauth::GOOGLE_TOKENINFO_URL,
            config.verifier_timeout(),
        )?;
        Ok(Self::new(config, identities, sessions, Arc::new(verifier)))
    }
}
