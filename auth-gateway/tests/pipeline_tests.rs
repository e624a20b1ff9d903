//! The gateway middleware stacked the way an application mounts it

use async_trait::async_trait;
use auth_gateway::{
    gate, resolver, session, AuthGateway, GatewayConfig, MemorySessionStore, RequestIdentity, Session,
    TrustLevel,
};
use auth_identity::InMemoryIdentityStore;
use auth_oauth::{TokenVerifier, VerifiedClaim};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    middleware::from_fn_with_state,
    response::Response,
    routing::{get, post},
    Router,
};
use mockall::mock;
use std::sync::Arc;
use tower::ServiceExt;

mock! {
    pub Verifier {}

    #[async_trait]
    impl TokenVerifier for Verifier {
        async fn verify(&self, credential: &str) -> auth_oauth::Result<VerifiedClaim>;
    }
}

fn app() -> Router {
    let mut verifier = MockVerifier::new();
    verifier.expect_verify().returning(|credential| {
        Ok(VerifiedClaim {
            audience: "client-1".to_string(),
            issuer: "accounts.google.com".to_string(),
            email: format!("{credential}@example.com"),
            name: credential.to_string(),
        })
    });

    let gateway = AuthGateway::new(
        GatewayConfig::new("owner@example.com", "client-1"),
        Arc::new(InMemoryIdentityStore::new()),
        Arc::new(MemorySessionStore::new()),
        Arc::new(verifier),
    );
    let login = gateway.login.clone();

    let admin = Router::new()
        .route("/admin", get(|| async { "admin" }))
        .route_layer(from_fn_with_state(gateway.gatekeeper.clone(), gate::require_admin));

    Router::new()
        .route(
            "/login/:who",
            post(move |session: Session, axum::extract::Path(who): axum::extract::Path<String>| {
                let login = login.clone();
                async move {
                    match login.login(&session, &who).await {
                        Ok(_) => StatusCode::OK,
                        Err(_) => StatusCode::BAD_REQUEST,
                    }
                }
            }),
        )
        .route(
            "/trust",
            get(|identity: RequestIdentity| async move { format!("{:?}", identity.trust_level()) }),
        )
        .route(
            "/static/app.js",
            get(|identity: RequestIdentity| async move { format!("{:?}", identity.trust_level()) }),
        )
        .merge(admin)
        .layer(from_fn_with_state(gateway.resolver.clone(), resolver::authenticate))
        .layer(from_fn_with_state(gateway.sessions.clone(), session::load_and_save))
}

fn cookie_of(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string)
        .unwrap()
}

fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn trust_follows_the_signed_in_identity() {
    let app = app();

    let anonymous = app.clone().oneshot(request(Method::GET, "/trust", None)).await.unwrap();
    assert_eq!(text(anonymous).await, format!("{:?}", TrustLevel::Anonymous));

    let guest = app.clone().oneshot(request(Method::POST, "/login/guest", None)).await.unwrap();
    let guest = cookie_of(&guest);
    let response = app.clone().oneshot(request(Method::GET, "/trust", Some(&guest))).await.unwrap();
    assert_eq!(text(response).await, format!("{:?}", TrustLevel::Authenticated));

    let owner = app.clone().oneshot(request(Method::POST, "/login/owner", None)).await.unwrap();
    let owner = cookie_of(&owner);
    let response = app.clone().oneshot(request(Method::GET, "/trust", Some(&owner))).await.unwrap();
    assert_eq!(text(response).await, format!("{:?}", TrustLevel::Administrator));
}

#[tokio::test]
async fn admin_gate_sits_behind_the_resolver() {
    let app = app();
    let guest = app.clone().oneshot(request(Method::POST, "/login/guest", None)).await.unwrap();
    let guest = cookie_of(&guest);
    let owner = app.clone().oneshot(request(Method::POST, "/login/owner", None)).await.unwrap();
    let owner = cookie_of(&owner);

    let denied = app.clone().oneshot(request(Method::GET, "/admin", Some(&guest))).await.unwrap();
    assert_eq!(denied.status(), StatusCode::SEE_OTHER);
    assert_eq!(denied.headers().get(header::LOCATION).unwrap(), "/not-authorized");

    let allowed = app.clone().oneshot(request(Method::GET, "/admin", Some(&owner))).await.unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
}

#[tokio::test]
async fn static_requests_are_never_resolved() {
    let app = app();
    let owner = app.clone().oneshot(request(Method::POST, "/login/owner", None)).await.unwrap();
    let owner = cookie_of(&owner);

    // The extractor falls back to anonymous when no identity was attached
    let response = app
        .oneshot(request(Method::GET, "/static/app.js", Some(&owner)))
        .await
        .unwrap();
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(text(response).await, format!("{:?}", TrustLevel::Anonymous));
}
