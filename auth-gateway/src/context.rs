use async_trait::async_trait;
use auth_identity::Identity;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Serialize;
use std::convert::Infallible;

/// How much a request is trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    Anonymous,
    Authenticated,
    Administrator,
}

/// Who is making the current request.
///
/// Only [`RequestIdentity::anonymous`] and [`RequestIdentity::resolved`]
/// construct one, so an administrator is always authenticated and an
/// authenticated request always carries its identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestIdentity {
    identity: Option<Identity>,
    is_admin: bool,
}

impl RequestIdentity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// `admin_email` names the single administrator account; an empty
    /// value means nobody is administrator
    pub fn resolved(identity: Identity, admin_email: &str) -> Self {
        let is_admin = !admin_email.is_empty() && identity.has_email(admin_email);
        Self {
            identity: Some(identity),
            is_admin,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn trust_level(&self) -> TrustLevel {
        match (&self.identity, self.is_admin) {
            (None, _) => TrustLevel::Anonymous,
            (Some(_), false) => TrustLevel::Authenticated,
            (Some(_), true) => TrustLevel::Administrator,
        }
    }
}

/// Anonymous when the resolver did not run for this route
#[async_trait]
impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn identity(email: &str) -> Identity {
        Identity {
            id: 1,
            email: email.to_string(),
            display_name: "Test".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn anonymous_has_no_identity() {
        let ctx = RequestIdentity::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(!ctx.is_admin());
        assert!(ctx.identity().is_none());
        assert_eq!(ctx.trust_level(), TrustLevel::Anonymous);
    }

    #[test]
    fn admin_email_grants_administrator() {
        let ctx = RequestIdentity::resolved(identity("owner@example.com"), "owner@example.com");
        assert!(ctx.is_admin());
        assert_eq!(ctx.trust_level(), TrustLevel::Administrator);
    }

    #[test]
    fn other_email_is_plain_authenticated() {
        let ctx = RequestIdentity::resolved(identity("guest@example.com"), "owner@example.com");
        assert!(ctx.is_authenticated());
        assert!(!ctx.is_admin());
        assert_eq!(ctx.trust_level(), TrustLevel::Authenticated);
    }

    #[test]
    fn blank_admin_email_never_matches() {
        let ctx = RequestIdentity::resolved(identity(""), "");
        assert!(!ctx.is_admin());
    }

    #[test]
    fn trust_levels_are_ordered() {
        assert!(TrustLevel::Anonymous < TrustLevel::Authenticated);
        assert!(TrustLevel::Authenticated < TrustLevel::Administrator);
    }
}
