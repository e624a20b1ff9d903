use super::{Session, SessionStore, Status};
use crate::config::SessionConfig;
use crate::error::internal_error_response;
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use time::OffsetDateTime;

/// Loads sessions from cookies and writes them back after the handler
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    config: Arc<SessionConfig>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn session_cookie(&self, token: String, deadline: DateTime<Utc>) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .secure(self.config.cookie_secure)
            .same_site(SameSite::Lax)
            .expires(OffsetDateTime::from_unix_timestamp(deadline.timestamp()).ok())
            .build()
    }

    fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), "")).path("/").build()
    }
}

/// Static assets never touch the session
pub fn is_static_asset(request: &Request) -> bool {
    request.method() == Method::GET && request.uri().path().contains("/static")
}

/// Session middleware: load, run the handler, commit
pub async fn load_and_save(
    State(manager): State<SessionManager>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if is_static_asset(&request) {
        return next.run(request).await;
    }

    let token = jar.get(&manager.config.cookie_name).map(|c| c.value().to_string());
    let session = match Session::load(manager.store.clone(), manager.config.lifetime(), token.as_deref()).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, action = "load session", "Failed to load session");
            return internal_error_response();
        }
    };

    request.extensions_mut().insert(session.clone());
    let response = next.run(request).await;

    match session.status() {
        Status::Unmodified => response,
        Status::Destroyed => (jar.remove(manager.removal_cookie()), response).into_response(),
        Status::Modified => match session.commit().await {
            Ok(Some((token, deadline))) => {
                (jar.add(manager.session_cookie(token, deadline)), response).into_response()
            }
            Ok(None) => response,
            Err(e) => {
                tracing::error!(error = %e, action = "commit session", "Failed to commit session");
                internal_error_response()
            }
        },
    }
}
