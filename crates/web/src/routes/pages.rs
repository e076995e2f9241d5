//! Static page route handlers: the product demo and the 404 page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentAccount;

/// Demo page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/demo.html")]
pub struct DemoTemplate {
    pub account: Option<CurrentAccount>,
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub account: Option<CurrentAccount>,
    pub path: String,
}

/// Display the product demo page.
#[instrument(skip_all)]
pub async fn demo(OptionalAuth(account): OptionalAuth) -> impl IntoResponse {
    DemoTemplate { account }
}

/// Fallback for every unmatched route.
#[instrument(skip_all, fields(path = %uri.path()))]
pub async fn not_found(OptionalAuth(account): OptionalAuth, uri: Uri) -> impl IntoResponse {
    tracing::debug!("No route for path");
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            account,
            path: uri.path().to_string(),
        },
    )
}
