use crate::context::{RequestIdentity, TrustLevel};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// Minimum trust a route requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Respond(Denial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub required: TrustLevel,
    pub actual: TrustLevel,
}

impl Gate {
    pub fn required(self) -> TrustLevel {
        match self {
            Gate::Authenticated => TrustLevel::Authenticated,
            Gate::Admin => TrustLevel::Administrator,
        }
    }

    pub fn check(self, identity: &RequestIdentity) -> Outcome {
        let allowed = match self {
            Gate::Authenticated => identity.is_authenticated(),
            Gate::Admin => identity.is_admin(),
        };

        if allowed {
            Outcome::Continue
        } else {
            Outcome::Respond(Denial {
                required: self.required(),
                actual: identity.trust_level(),
            })
        }
    }
}

/// Shared state of the gate middleware
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    not_authorized_path: Arc<str>,
}

impl Gatekeeper {
    pub fn new(not_authorized_path: &str) -> Self {
        Self {
            not_authorized_path: Arc::from(not_authorized_path),
        }
    }

    /// 303 to the not-authorized page
    pub fn deny(&self, denial: Denial) -> Response {
        tracing::debug!(
            required = ?denial.required,
            actual = ?denial.actual,
            "Request denied by gate"
        );
        Redirect::to(&self.not_authorized_path).into_response()
    }

    async fn enforce(&self, gate: Gate, request: Request, next: Next) -> Response {
        let identity = request
            .extensions()
            .get::<RequestIdentity>()
            .cloned()
            .unwrap_or_default();

        match gate.check(&identity) {
            Outcome::Continue => next.run(request).await,
            Outcome::Respond(denial) => self.deny(denial),
        }
    }
}

pub async fn require_authenticated(
    State(keeper): State<Gatekeeper>,
    request: Request,
    next: Next,
) -> Response {
    keeper.enforce(Gate::Authenticated, request, next).await
}

pub async fn require_admin(
    State(keeper): State<Gatekeeper>,
    request: Request,
    next: Next,
) -> Response {
    keeper.enforce(Gate::Admin, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_identity::Identity;
    use axum::{
        body::Body,
        http::{header, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use chrono::Utc;
    use proptest::prelude::*;
    use tower::ServiceExt;

    fn identity(email: &str) -> Identity {
        Identity {
            id: 9,
            email: email.to_string(),
            display_name: "Nine".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn anonymous_is_denied_everywhere() {
        let anon = RequestIdentity::anonymous();
        assert!(matches!(Gate::Authenticated.check(&anon), Outcome::Respond(_)));
        assert_eq!(
            Gate::Admin.check(&anon),
            Outcome::Respond(Denial {
                required: TrustLevel::Administrator,
                actual: TrustLevel::Anonymous,
            })
        );
    }

    #[test]
    fn authenticated_passes_only_the_authenticated_gate() {
        let user = RequestIdentity::resolved(identity("guest@example.com"), "owner@example.com");
        assert_eq!(Gate::Authenticated.check(&user), Outcome::Continue);
        assert!(matches!(Gate::Admin.check(&user), Outcome::Respond(_)));
    }

    #[test]
    fn admin_passes_both_gates() {
        let admin = RequestIdentity::resolved(identity("owner@example.com"), "owner@example.com");
        assert_eq!(Gate::Authenticated.check(&admin), Outcome::Continue);
        assert_eq!(Gate::Admin.check(&admin), Outcome::Continue);
    }

    proptest! {
        #[test]
        fn admin_implies_authenticated(
            email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
            admin_email in prop_oneof![Just(String::new()), "[a-z]{1,8}@[a-z]{1,8}\\.com"],
            same in any::<bool>(),
        ) {
            let admin_email = if same { email.clone() } else { admin_email };
            let ctx = RequestIdentity::resolved(identity(&email), &admin_email);

            if ctx.is_admin() {
                prop_assert!(ctx.is_authenticated());
                prop_assert!(ctx.identity().is_some());
            }
            prop_assert_eq!(ctx.is_admin(), email == admin_email);
            // Passing the admin gate always means passing the authenticated gate
            if Gate::Admin.check(&ctx) == Outcome::Continue {
                prop_assert_eq!(Gate::Authenticated.check(&ctx), Outcome::Continue);
            }
        }
    }

    #[tokio::test]
    async fn denied_request_is_redirected_without_running_handler() {
        let app = Router::new()
            .route("/admin", get(|| async { "secret" }))
            .layer(middleware::from_fn_with_state(
                Gatekeeper::new("/not-authorized"),
                require_admin,
            ));

        let response = app
            .oneshot(Request::builder().uri("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/not-authorized");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }
}
