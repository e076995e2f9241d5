//! Login and registration rules.
//!
//! The backend decides who a set of credentials belongs to. This module
//! decides what the site does with the answer: only business users may sign
//! in here, and only a role and an email survive the login.

use serde::{Deserialize, Serialize};

use crate::types::Email;
use crate::validation::FieldErrors;

/// Role string the backend uses for business users.
pub const BUSINESS_USER_ROLE: &str = "BUSER";

/// Role returned by the backend on login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountRole {
    /// `"BUSER"`: may use the business dashboard.
    BusinessUser,
    /// Any other role string, kept verbatim for logging.
    Other(String),
}

impl AccountRole {
    #[must_use]
    pub fn from_api(role: &str) -> Self {
        if role == BUSINESS_USER_ROLE {
            Self::BusinessUser
        } else {
            Self::Other(role.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::BusinessUser => BUSINESS_USER_ROLE,
            Self::Other(role) => role,
        }
    }
}

/// Email/password pair posted by the login form and forwarded to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Both fields must be present before the backend is called.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("email", &self.email, "Email is required");
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors
    }
}

/// Body of a successful `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub role: String,
    pub email: String,
}

/// Why a successful backend login was still refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginRejected {
    /// The account is not a business user.
    #[error("role {0} may not sign in to the business dashboard")]
    RoleNotAllowed(String),
}

impl LoginRejected {
    /// Message shown above the login form.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::RoleNotAllowed(_) => "Access denied. Only business users can log in here.",
        }
    }
}

/// What the site keeps after a login: a role and an email. No token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInAccount {
    pub role: String,
    pub email: String,
}

/// Accept or refuse a backend login response.
///
/// # Errors
///
/// Returns [`LoginRejected::RoleNotAllowed`] for any role other than `"BUSER"`.
pub fn authorize_login(response: LoginResponse) -> Result<SignedInAccount, LoginRejected> {
    match AccountRole::from_api(&response.role) {
        AccountRole::BusinessUser => Ok(SignedInAccount {
            role: response.role,
            email: response.email,
        }),
        AccountRole::Other(role) => Err(LoginRejected::RoleNotAllowed(role)),
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Which tab the registration form was submitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Business,
    Admin,
}

/// Registration form as posted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub account_type: AccountType,
    pub business_name: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub account_type: AccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    /// Check the form and build the backend request.
    ///
    /// Business name is only asked for (and only required) on the business tab.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when anything is missing or the
    /// passwords differ.
    pub fn into_request(self) -> Result<RegistrationRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.account_type == AccountType::Business {
            errors.require("business_name", &self.business_name, "Business name is required");
        }
        errors.require("full_name", &self.full_name, "Full name is required");
        if errors.require("email", &self.email, "Email is required")
            && Email::parse(self.email.trim()).is_err()
        {
            errors.add("email", "Email is invalid");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password != self.confirm_password {
            errors.add("confirm_password", "Passwords do not match");
        }
        errors.into_result()?;

        Ok(RegistrationRequest {
            account_type: self.account_type,
            business_name: (self.account_type == AccountType::Business)
                .then(|| self.business_name.trim().to_string()),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}
