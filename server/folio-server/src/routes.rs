use crate::{
    handlers::{auth, pages, preferences},
    server::FolioServer,
};
use auth_gateway::{gate, resolver, session};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

pub mod paths {
    pub const INDEX: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const LOGOUT: &str = "/logout";
    pub const ME: &str = "/me";
    pub const ADMIN: &str = "/admin";
    pub const NOT_AUTHORIZED: &str = "/not-authorized";
    pub const TOGGLE_DARK: &str = "/toggledark";
    pub const STATIC: &str = "/static";
    pub const HEALTH: &str = "/health";
}

/// Routes open to every caller
pub fn public_routes() -> Router<FolioServer> {
    Router::new()
        .route(paths::INDEX, get(pages::index))
        .route(paths::LOGIN, post(auth::login))
        .route(paths::TOGGLE_DARK, put(preferences::toggle_dark))
        .route(paths::NOT_AUTHORIZED, get(pages::not_authorized))
}

/// Routes requiring a signed-in user
pub fn member_routes(server: &FolioServer) -> Router<FolioServer> {
    Router::new()
        .route(paths::LOGOUT, get(auth::logout))
        .route(paths::ME, get(auth::me))
        .route_layer(from_fn_with_state(
            server.gateway.gatekeeper.clone(),
            gate::require_authenticated,
        ))
}

/// Routes reserved to the administrator
pub fn admin_routes(server: &FolioServer) -> Router<FolioServer> {
    Router::new()
        .route(paths::ADMIN, get(pages::admin))
        .route_layer(from_fn_with_state(
            server.gateway.gatekeeper.clone(),
            gate::require_admin,
        ))
}

/// Site routes wrapped in the session and identity middleware.
///
/// Layers run outermost first: session load, identity resolution, gates,
/// handler.
pub fn create_routes(server: &FolioServer) -> Router<FolioServer> {
    Router::new()
        .merge(public_routes())
        .merge(member_routes(server))
        .merge(admin_routes(server))
        .nest_service(paths::STATIC, ServeDir::new(&server.settings.static_dir))
        .fallback(pages::not_found)
        .layer(from_fn_with_state(
            server.gateway.resolver.clone(),
            resolver::authenticate,
        ))
        .layer(from_fn_with_state(
            server.gateway.sessions.clone(),
            session::load_and_save,
        ))
}
