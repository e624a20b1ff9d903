use crate::error::LoginError;
use crate::session::{Session, AUTHENTICATED_USER_ID, FLASH};
use auth_identity::{Identity, IdentityService, IdentityStore};
use auth_oauth::{ClaimPolicy, TokenVerifier};
use logger_redacted::PiiRedactor;
use std::sync::Arc;

pub const LOGOUT_FLASH: &str = "You've been logged out successfully!";

/// Exchanges a verified credential for an authenticated session
pub struct LoginService {
    verifier: Arc<dyn TokenVerifier>,
    policy: ClaimPolicy,
    identities: IdentityService,
    redactor: PiiRedactor,
}

impl LoginService {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        policy: ClaimPolicy,
        identities: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            verifier,
            policy,
            identities: IdentityService::new(identities),
            redactor: PiiRedactor::default(),
        }
    }

    /// Verify `credential`, find or create its identity and bind it to
    /// `session` under a fresh token.
    ///
    /// Nothing is written to the session unless every check passes.
    pub async fn login(&self, session: &Session, credential: &str) -> Result<Identity, LoginError> {
        if credential.trim().is_empty() {
            return Err(LoginError::BadRequest("credential must not be empty".to_string()));
        }

        let claim = self.verifier.verify(credential).await?;
        self.policy.validate(&claim)?;

        let existing = self
            .identities
            .store()
            .find_by_email(&claim.email)
            .await
            .map_err(|source| LoginError::Store {
                action: "get user by email",
                source,
            })?;

        let identity = match existing {
            Some(identity) => identity,
            None => self
                .identities
                .create_or_fetch(&claim.email, &claim.name)
                .await
                .map_err(|source| LoginError::Store {
                    action: "create user",
                    source,
                })?,
        };

        session
            .renew_token()
            .await
            .map_err(|source| LoginError::Session {
                action: "setting user id in session",
                source,
            })?;
        session.put(AUTHENTICATED_USER_ID, identity.id);

        tracing::info!(
            user_id = identity.id,
            email = %self.redactor.redact_email(&identity.email),
            "User signed in"
        );
        Ok(identity)
    }
}

/// Drop the identity from `session` and leave a flash message.
///
/// Token rotation is best-effort here: a failure is logged and sign-out
/// still completes.
pub async fn logout(session: &Session) {
    if let Err(e) = session.renew_token().await {
        tracing::error!(error = %e, action = "renew token on logout", "Failed to rotate session token");
    }

    let user_id = session.get_i64(AUTHENTICATED_USER_ID);
    session.remove(AUTHENTICATED_USER_ID);
    session.put(FLASH, LOGOUT_FLASH);

    tracing::info!(user_id, "User signed out");
}
