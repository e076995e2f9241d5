//! Session-related types.
//!
//! Everything a visitor has in flight lives in their session: who they
//! signed in as, the registration wizard, and review-link settings.

use reviewhut_core::auth::SignedInAccount;
use serde::{Deserialize, Serialize};

/// Session-stored account identity.
///
/// Only the role and email returned by the backend are kept. No token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAccount {
    /// Backend role string (always `"BUSER"` for accounts that got this far).
    pub role: String,
    /// Email the backend returned.
    pub email: String,
}

impl From<SignedInAccount> for CurrentAccount {
    fn from(account: SignedInAccount) -> Self {
        Self {
            role: account.role,
            email: account.email,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current signed-in account.
    pub const CURRENT_ACCOUNT: &str = "current_account";

    /// Key for the business registration wizard.
    pub const REGISTRATION_WIZARD: &str = "registration_wizard";

    /// Key for review-link settings.
    pub const REVIEW_LINK_SETTINGS: &str = "review_link_settings";
}
