use auth_identity::IdentityError;
use auth_oauth::OAuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message shown to clients for every internal failure
pub const SERVER_ERROR_MESSAGE: &str =
    "this server encountered a problem and could not process your request";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session backend error: {0}")]
    Backend(String),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session middleware is not installed on this route")]
    NotLoaded,
}

/// Why a sign-in attempt failed
#[derive(Error, Debug)]
pub enum LoginError {
    /// The client sent something we will not accept
    #[error("{0}")]
    BadRequest(String),

    /// The identity provider could not be reached or answered garbage
    #[error("identity provider call failed: {0}")]
    Upstream(#[source] OAuthError),

    #[error("{action}: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: IdentityError,
    },

    #[error("{action}: {source}")]
    Session {
        action: &'static str,
        #[source]
        source: SessionError,
    },
}

impl LoginError {
    /// Name of the step that failed, for server-side logs
    pub fn action(&self) -> &'static str {
        match self {
            LoginError::BadRequest(_) => "validate credential",
            LoginError::Upstream(_) => "google login api call",
            LoginError::Store { action, .. } | LoginError::Session { action, .. } => action,
        }
    }
}

impl From<OAuthError> for LoginError {
    fn from(err: OAuthError) -> Self {
        if err.is_client_error() {
            LoginError::BadRequest(err.to_string())
        } else {
            LoginError::Upstream(err)
        }
    }
}

/// Generic 500 response used by the middleware in this crate
pub(crate) fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": SERVER_ERROR_MESSAGE })),
    )
        .into_response()
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Session error");
        internal_error_response()
    }
}
