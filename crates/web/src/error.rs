//! Request errors and Sentry helpers.
//!
//! Handlers return [`AppError`] for failures the visitor cannot fix. Form
//! validation failures are not errors: those re-render the page with inline
//! messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::ApiError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session store failed to load or save.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed upload or form body.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Status and the body shown to the visitor. Server-side details stay in
    /// the logs.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Api(_) => (StatusCode::BAD_GATEWAY, "External service error".to_string()),
            Self::Session(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request error");
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Tag the Sentry scope with the logged-in account.
///
/// The backend gives us no stable user id, so the email stands in for one.
pub fn set_sentry_user(email: &str, role: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(email.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }));
        scope.set_tag("account_role", role);
    });
}

/// Forget the account on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
        scope.remove_tag("account_role");
    });
}

/// Record a visitor action so later error reports show how they got there.
///
/// ```rust,ignore
/// add_breadcrumb("wizard", "Advanced step", &[("step", "2")]);
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data: data
            .iter()
            .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
            .collect(),
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_show_their_message() {
        let response = AppError::NotFound("business 42".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let (status, message) = AppError::BadRequest("missing field".to_string()).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Bad request: missing field");
    }

    #[test]
    fn test_backend_errors_are_hidden() {
        let err = AppError::Api(ApiError::Status {
            status: 500,
            message: "stack trace from backend".to_string(),
        });
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(message, "External service error");
    }
}
