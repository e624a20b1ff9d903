use crate::error::ApiError;
use askama::Template;
use auth_gateway::{RequestIdentity, Session, DARK_MODE, FLASH};
use auth_identity::Identity;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

/// Data every rendered page receives
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageContext {
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub user: Option<Identity>,
    pub google_client_id: String,
    pub is_dark: bool,
}

impl PageContext {
    /// Build the context for one request; reading the flash consumes it
    pub fn new(session: &Session, identity: &RequestIdentity, google_client_id: &str) -> Self {
        Self {
            flash: session.pop_string(FLASH),
            is_authenticated: identity.is_authenticated(),
            is_admin: identity.is_admin(),
            user: identity.identity().cloned(),
            google_client_id: google_client_id.to_string(),
            is_dark: session.get_bool(DARK_MODE).unwrap_or(false),
        }
    }
}

/// Sink for HTML pages; templating lives behind this trait
pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &str, ctx: &PageContext) -> Response;
}

/// Page layout shared by every route
#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    page: &'a str,
    ctx: &'a PageContext,
}

/// Renders pages through the askama `page.html` layout
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl PageRenderer for TemplateRenderer {
    fn render(&self, page: &str, ctx: &PageContext) -> Response {
        match (PageTemplate { page, ctx }).render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => ApiError::internal("render page", e.to_string()).into_response(),
        }
    }
}
