use thiserror::Error;

/// Process-level error for Folio services
#[derive(Error, Debug)]
pub enum FolioError {
    /// Network communication errors (bind, connect)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server runtime errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Database connection and schema errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Session backend errors
    #[error("Session store error: {0}")]
    SessionError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl FolioError {
    pub fn config(message: impl Into<String>) -> Self {
        FolioError::ConfigError(message.into())
    }

    /// Startup failures that an operator fixes by changing flags or env
    pub fn is_config_error(&self) -> bool {
        matches!(self, FolioError::ConfigError(_))
    }
}

/// Result type alias for Folio operations
pub type Result<T> = std::result::Result<T, FolioError>;

/// Log a process-level error with the action that produced it
pub fn log_error(action: &str, error: &FolioError) {
    tracing::error!(
        action = action,
        error = %error,
        "Folio error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_classified() {
        let err = FolioError::config("dsn is not provided");
        assert!(err.is_config_error());
        assert_eq!(err.to_string(), "Configuration error: dsn is not provided");
        assert!(!FolioError::NetworkError("bind".into()).is_config_error());
    }
}
