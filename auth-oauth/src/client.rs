use crate::{error::*, models::*, provider::TokenVerifier};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;

pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Verifies Google ID tokens through the `tokeninfo` endpoint
#[derive(Debug, Clone)]
pub struct GoogleTokenInfoClient {
    http_client: HttpClient,
    endpoint: String,
}

impl GoogleTokenInfoClient {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(GOOGLE_TOKENINFO_URL, DEFAULT_TIMEOUT)
    }

    /// Point the client at another endpoint, e.g. a local stub in tests
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenInfoClient {
    async fn verify(&self, credential: &str) -> Result<VerifiedClaim> {
        if credential.trim().is_empty() {
            return Err(OAuthError::EmptyCredential);
        }

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("id_token", credential)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "tokeninfo rejected credential");
            return Err(OAuthError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let info: TokenInfoResponse = serde_json::from_slice(&body)?;
        // A missing `aud` is left to the claim policy, which rejects it as a mismatch
        if info.email.is_empty() {
            return Err(OAuthError::InvalidResponse(
                "tokeninfo response lacks email".to_string(),
            ));
        }

        Ok(info.into())
    }
}
