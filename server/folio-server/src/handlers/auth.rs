use crate::{error::ApiError, extract::StrictJson, server::FolioServer};
use auth_gateway::{RequestIdentity, Session};
use axum::{
    extract::State,
    http::{header::REFERER, HeaderMap},
    response::{Json, Redirect},
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginInput {
    /// Google ID token from the sign-in button
    #[serde(default)]
    pub token: String,
}

/// POST /login
pub async fn login(
    State(server): State<FolioServer>,
    session: Session,
    StrictJson(input): StrictJson<LoginInput>,
) -> Result<Json<Value>, ApiError> {
    let identity = server.gateway.login.login(&session, &input.token).await?;
    Ok(Json(json!({ "account": identity })))
}

/// GET /logout, back to where the user came from
pub async fn logout(session: Session, headers: HeaderMap) -> Redirect {
    auth_gateway::logout(&session).await;

    let target = headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("/");
    Redirect::to(target)
}

/// GET /me
pub async fn me(identity: RequestIdentity) -> Result<Json<Value>, ApiError> {
    let account = identity
        .identity()
        .ok_or_else(|| ApiError::internal("get user from request", "authenticated route without identity"))?;
    Ok(Json(json!({ "account": account })))
}
