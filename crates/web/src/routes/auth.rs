//! Authentication route handlers.
//!
//! Login and registration are forwarded to the backend. Only business users
//! may sign in; the session then holds their role and email.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use reviewhut_core::FieldErrors;
use reviewhut_core::auth::{AccountType, Credentials, RegistrationForm, authorize_login};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_account, set_current_account};
use crate::models::CurrentAccount;
use crate::state::AppState;

/// Shown for any backend or transport failure during login.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials and try again.";

const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    /// Prefill for the email field, set after registration.
    pub email: Option<String>,
}

/// Registration tab selection.
#[derive(Debug, Deserialize)]
pub struct RegisterQuery {
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
}

fn success_message(code: &str) -> Option<&'static str> {
    match code {
        "registered" => Some("Account created. You can now sign in."),
        _ => None,
    }
}

fn error_message(code: &str) -> Option<&'static str> {
    match code {
        "session" => Some("Your session could not be saved. Please try again."),
        _ => None,
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub account: Option<CurrentAccount>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub account: Option<CurrentAccount>,
    pub is_business: bool,
    pub business_name: String,
    pub full_name: String,
    pub email: String,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

impl RegisterTemplate {
    fn blank(account: Option<CurrentAccount>, account_type: AccountType) -> Self {
        Self {
            account,
            is_business: account_type == AccountType::Business,
            business_name: String::new(),
            full_name: String::new(),
            email: String::new(),
            errors: FieldErrors::new(),
            error: None,
        }
    }

    fn refill(account: Option<CurrentAccount>, form: &RegistrationForm) -> Self {
        Self {
            business_name: form.business_name.clone(),
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            ..Self::blank(account, form.account_type)
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip(account))]
pub async fn login_page(
    OptionalAuth(account): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        account,
        error: query
            .error
            .as_deref()
            .and_then(error_message)
            .map(String::from),
        success: query
            .success
            .as_deref()
            .and_then(success_message)
            .map(String::from),
        email: query.email.unwrap_or_default(),
    }
}

/// Handle login form submission.
///
/// A role other than `"BUSER"` gets an error and no session write.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<Credentials>,
) -> Result<Response> {
    let inline_error = |status: StatusCode, message: &str| {
        (
            status,
            LoginTemplate {
                account: None,
                error: Some(message.to_string()),
                success: None,
                email: form.email.clone(),
            },
        )
            .into_response()
    };

    if let Some((_, message)) = form.validate().iter().next() {
        return Ok(inline_error(StatusCode::UNPROCESSABLE_ENTITY, message));
    }

    let response = match state.api().login(&form).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            return Ok(inline_error(StatusCode::UNAUTHORIZED, LOGIN_FAILED_MESSAGE));
        }
    };

    match authorize_login(response) {
        Ok(signed_in) => {
            let account = CurrentAccount::from(signed_in);
            if let Err(e) = set_current_account(&session, &account).await {
                tracing::error!("Failed to set session: {}", e);
                return Ok(Redirect::to("/login?error=session").into_response());
            }
            set_sentry_user(&account.email, &account.role);
            add_breadcrumb("auth", "Logged in", &[("role", account.role.as_str())]);
            tracing::info!("Business user signed in");
            Ok(Redirect::to("/business/dashboard").into_response())
        }
        Err(rejected) => {
            tracing::info!(reason = %rejected, "Login refused");
            Ok(inline_error(StatusCode::FORBIDDEN, rejected.user_message()))
        }
    }
}

/// Handle logout: drop the whole session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_account(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/login"))
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip(account))]
pub async fn register_page(
    OptionalAuth(account): OptionalAuth,
    Query(query): Query<RegisterQuery>,
) -> impl IntoResponse {
    RegisterTemplate::blank(account, query.account_type.unwrap_or_default())
}

/// Handle registration form submission.
#[instrument(skip(state, account, form), fields(email = %form.email, account_type = ?form.account_type))]
pub async fn register(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    Form(form): Form<RegistrationForm>,
) -> Response {
    let mut page = RegisterTemplate::refill(account, &form);

    let request = match form.into_request() {
        Ok(request) => request,
        Err(errors) => {
            page.errors = errors;
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.api().register(&request).await {
        Ok(()) => {
            tracing::info!("Account registered");
            let target = format!(
                "/login?success=registered&email={}",
                urlencoding::encode(&request.email)
            );
            Redirect::to(&target).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            page.error = Some(REGISTER_FAILED_MESSAGE.to_string());
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

// =============================================================================
// Legacy Aliases
// =============================================================================

/// `/login-review` predates `/login`.
pub async fn login_alias() -> Redirect {
    Redirect::permanent("/login")
}

/// `/register-review` predates `/register`.
pub async fn register_alias() -> Redirect {
    Redirect::permanent("/register")
}
