use crate::{render::PageContext, server::FolioServer};
use auth_gateway::{RequestIdentity, Session};
use axum::{extract::State, http::StatusCode, response::Response};

fn render(server: &FolioServer, page: &str, session: &Session, identity: &RequestIdentity) -> Response {
    let ctx = PageContext::new(session, identity, &server.settings.gateway.google_client_id);
    server.renderer.render(page, &ctx)
}

pub async fn index(
    State(server): State<FolioServer>,
    session: Session,
    identity: RequestIdentity,
) -> Response {
    render(&server, "index", &session, &identity)
}

pub async fn admin(
    State(server): State<FolioServer>,
    session: Session,
    identity: RequestIdentity,
) -> Response {
    render(&server, "admin", &session, &identity)
}

pub async fn not_authorized(
    State(server): State<FolioServer>,
    session: Session,
    identity: RequestIdentity,
) -> Response {
    render(&server, "not-authorized", &session, &identity)
}

/// Fallback for unknown paths
pub async fn not_found(
    State(server): State<FolioServer>,
    session: Session,
    identity: RequestIdentity,
) -> Response {
    let mut response = render(&server, "not-found", &session, &identity);
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}
