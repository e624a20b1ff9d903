use crate::{error::*, models::VerifiedClaim};

pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Audience and issuer requirements for an accepted credential
#[derive(Debug, Clone)]
pub struct ClaimPolicy {
    client_id: String,
    allowed_issuers: Vec<String>,
}

impl ClaimPolicy {
    /// Policy for Google sign-in with the given OAuth client id
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            allowed_issuers: GOOGLE_ISSUERS.iter().map(ToString::to_string).collect(),
        }
    }

    #[cfg(test)]
    #[must_use]
    fn with_issuers(mut self, issuers: Vec<String>) -> Self {
        self.allowed_issuers = issuers;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn validate(&self, claim: &VerifiedClaim) -> Result<()> {
        if claim.audience != self.client_id {
            return Err(OAuthError::AudienceMismatch);
        }
        if !self.allowed_issuers.iter().any(|issuer| *issuer == claim.issuer) {
            return Err(OAuthError::IssuerNotAllowed(claim.issuer.clone()));
        }
        Ok(())
    }
}
