//! Exercises GoogleTokenInfoClient against a local tokeninfo stub

use auth_oauth::{ClaimPolicy, GoogleTokenInfoClient, OAuthError, TokenVerifier};
use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

async fn tokeninfo(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<serde_json::Value>) {
    match params.get("id_token").map(String::as_str) {
        Some("good-token") => (
            StatusCode::OK,
            Json(json!({
                "aud": "client-1",
                "iss": "https://accounts.google.com",
                "email": "ada@example.com",
                "name": "Ada Lovelace",
                "email_verified": "true",
            })),
        ),
        Some("no-email") => (StatusCode::OK, Json(json!({ "aud": "client-1" }))),
        Some("no-aud") => (
            StatusCode::OK,
            Json(json!({
                "iss": "accounts.google.com",
                "email": "ada@example.com",
            })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_token" })),
        ),
    }
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/tokeninfo", get(tokeninfo))
        .route("/slow", get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "late"
        }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn valid_token_yields_claims() {
    let base = spawn_stub().await;
    let client =
        GoogleTokenInfoClient::with_endpoint(format!("{base}/tokeninfo"), Duration::from_secs(5)).unwrap();

    let claim = client.verify("good-token").await.unwrap();
    assert_eq!(claim.audience, "client-1");
    assert_eq!(claim.issuer, "https://accounts.google.com");
    assert_eq!(claim.email, "ada@example.com");
    assert_eq!(claim.name, "Ada Lovelace");
}

#[tokio::test]
async fn non_success_status_is_a_rejection() {
    let base = spawn_stub().await;
    let client =
        GoogleTokenInfoClient::with_endpoint(format!("{base}/tokeninfo"), Duration::from_secs(5)).unwrap();

    let err = client.verify("forged").await.unwrap_err();
    assert!(matches!(err, OAuthError::Rejected { status: 400 }));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn blank_credential_never_reaches_the_network() {
    // Unroutable endpoint: any request would fail with an HTTP error instead
    let client =
        GoogleTokenInfoClient::with_endpoint("http://127.0.0.1:9/tokeninfo", Duration::from_secs(1)).unwrap();

    let err = client.verify("   ").await.unwrap_err();
    assert!(matches!(err, OAuthError::EmptyCredential));
}

#[tokio::test]
async fn incomplete_body_is_an_upstream_error() {
    let base = spawn_stub().await;
    let client =
        GoogleTokenInfoClient::with_endpoint(format!("{base}/tokeninfo"), Duration::from_secs(5)).unwrap();

    let err = client.verify("no-email").await.unwrap_err();
    assert!(matches!(err, OAuthError::InvalidResponse(_)));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn missing_audience_is_rejected_by_policy() {
    let base = spawn_stub().await;
    let client =
        GoogleTokenInfoClient::with_endpoint(format!("{base}/tokeninfo"), Duration::from_secs(5)).unwrap();

    let claim = client.verify("no-aud").await.unwrap();
    assert_eq!(claim.audience, "");

    let err = ClaimPolicy::new("client-1").validate(&claim).unwrap_err();
    assert!(matches!(err, OAuthError::AudienceMismatch));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn slow_provider_times_out() {
    let base = spawn_stub().await;
    let client =
        GoogleTokenInfoClient::with_endpoint(format!("{base}/slow"), Duration::from_millis(200)).unwrap();

    let err = client.verify("good-token").await.unwrap_err();
    assert!(matches!(err, OAuthError::HttpError(ref e) if e.is_timeout()));
}
