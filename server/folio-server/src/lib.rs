//! Folio server - personal website with Google sign-in
//!
//! Wires the [`auth_gateway`] pipeline into an axum application: session
//! cookies, identity resolution, route gates, page rendering and the JSON
//! endpoints behind the sign-in button.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod server;

pub use config::{Args, SessionBackend, Settings};
pub use error::ApiError;
pub use server::FolioServer;

use axum::{middleware::from_fn, routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Create the main application router with all routes and middleware
pub fn create_app(server: FolioServer) -> Router {
    let timeout = Duration::from_secs(server.settings.request_timeout_secs);

    routes::create_routes(&server)
        // Probes stay outside the session pipeline
        .route(routes::paths::HEALTH, get(handlers::health::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(middleware::handle_panic))
                .layer(TimeoutLayer::new(timeout))
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
