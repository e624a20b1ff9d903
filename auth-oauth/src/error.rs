use thiserror::Error;

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("credential must not be empty")]
    EmptyCredential,

    #[error("identity provider rejected the credential (status {status})")]
    Rejected { status: u16 },

    #[error("credential was issued for a different client")]
    AudienceMismatch,

    #[error("credential issuer {0:?} is not trusted")]
    IssuerNotAllowed(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl OAuthError {
    /// True when the caller sent a bad credential, false when the
    /// identity provider could not be reached or answered garbage
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OAuthError::EmptyCredential
                | OAuthError::Rejected { .. }
                | OAuthError::AudienceMismatch
                | OAuthError::IssuerNotAllowed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OAuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(OAuthError::EmptyCredential.is_client_error());
        assert!(OAuthError::Rejected { status: 400 }.is_client_error());
        assert!(OAuthError::AudienceMismatch.is_client_error());
        assert!(OAuthError::IssuerNotAllowed("evil.example".into()).is_client_error());
        assert!(!OAuthError::InvalidResponse("missing aud".into()).is_client_error());
    }
}
