use auth_gateway::{LoginError, SERVER_ERROR_MESSAGE};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by JSON endpoints; the body is always `{"error": ...}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String },

    /// Details are logged, clients only see the generic message
    #[error("{action}: {message}")]
    Internal { action: &'static str, message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(action: &'static str, message: impl Into<String>) -> Self {
        Self::Internal {
            action,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::BadRequest(message) => ApiError::BadRequest { message },
            other => ApiError::internal(other.action(), other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match self {
            ApiError::BadRequest { message } => message,
            ApiError::Internal { action, message } => {
                error!(action, error = %message, status_code = status_code.as_u16(), "Request failed");
                SERVER_ERROR_MESSAGE.to_string()
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
