use auth_oauth::ClaimPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Longest session lifetime accepted from configuration (one year)
pub const MAX_SESSION_LIFETIME_HOURS: i64 = 24 * 366;

/// Gateway configuration structure.
///
/// Accepted issuers are not configurable: credentials must come from
/// Google ([`auth_oauth::GOOGLE_ISSUERS`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// The single account that gets administrator trust
    #[serde(default)]
    pub admin_email: String,
    /// OAuth client id that sign-in credentials must be issued for
    #[serde(default)]
    pub google_client_id: String,
    #[serde(default)]
    pub session: SessionConfig,
    /// Where denied requests are redirected
    #[serde(default = "default_not_authorized_path")]
    pub not_authorized_path: String,
    #[serde(default = "default_verifier_timeout_secs")]
    pub verifier_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub lifetime_hours: i64,
    /// Set the `Secure` attribute on the session cookie
    pub cookie_secure: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayConfigError {
    #[error("session lifetime must be between 1 and {MAX_SESSION_LIFETIME_HOURS} hours, got {0}")]
    SessionLifetime(i64),

    #[error("session cookie name must not be empty")]
    CookieName,

    #[error("verifier timeout must be at least one second")]
    VerifierTimeout,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            lifetime_hours: 12,
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    pub fn lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(self.lifetime_hours.clamp(1, MAX_SESSION_LIFETIME_HOURS))
    }

    pub fn validate(&self) -> Result<(), GatewayConfigError> {
        if !(1..=MAX_SESSION_LIFETIME_HOURS).contains(&self.lifetime_hours) {
            return Err(GatewayConfigError::SessionLifetime(self.lifetime_hours));
        }
        if self.cookie_name.trim().is_empty() {
            return Err(GatewayConfigError::CookieName);
        }
        Ok(())
    }
}

impl GatewayConfig {
    pub fn new(admin_email: impl Into<String>, google_client_id: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
            google_client_id: google_client_id.into(),
            session: SessionConfig::default(),
            not_authorized_path: default_not_authorized_path(),
            verifier_timeout_secs: default_verifier_timeout_secs(),
        }
    }

    pub fn claim_policy(&self) -> ClaimPolicy {
        ClaimPolicy::new(self.google_client_id.clone())
    }

    pub fn verifier_timeout(&self) -> Duration {
        Duration::from_secs(self.verifier_timeout_secs)
    }

    /// Bounds checks on the numeric settings
    pub fn validate(&self) -> Result<(), GatewayConfigError> {
        self.session.validate()?;
        if self.verifier_timeout_secs == 0 {
            return Err(GatewayConfigError::VerifierTimeout);
        }
        Ok(())
    }
}

fn default_not_authorized_path() -> String {
    "/not-authorized".to_string()
}

fn default_verifier_timeout_secs() -> u64 {
    5
}
