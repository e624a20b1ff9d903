use crate::{error::Result, models::VerifiedClaim};
use async_trait::async_trait;

/// Turns an opaque sign-in credential into verified claims.
///
/// Implementations only establish that the identity provider vouches for
/// the credential. Audience and issuer are checked separately by
/// [`crate::ClaimPolicy`].
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedClaim>;
}
