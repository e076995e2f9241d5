//! Account extractor and session helpers.
//!
//! Dashboards are open to everyone; the signed-in account only changes what
//! the sidebar shows.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{CurrentAccount, session_keys};

/// Extractor that optionally gets the signed-in account.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(account): OptionalAuth,
/// ) -> impl IntoResponse {
///     match account {
///         Some(a) => format!("Hello, {}!", a.email),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentAccount>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentAccount>(session_keys::CURRENT_ACCOUNT)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(account))
    }
}

/// Store the signed-in account in the session.
///
/// The session id is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_account(
    session: &Session,
    account: &CurrentAccount,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ACCOUNT, account).await
}

/// Drop the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_current_account(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
