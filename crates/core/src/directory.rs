//! Records shown on the admin and business dashboards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{
    BusinessId, BusinessStatus, Email, ReviewId, ReviewPlatform, UserId, UserRole, UserStatus,
};
use crate::validation::FieldErrors;

/// A business registered on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub category: String,
    pub status: BusinessStatus,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub description: String,
    pub rating: f32,
    pub review_count: u32,
    pub review_gating: bool,
    pub joined: NaiveDate,
}

/// A person with access to one business's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub business_id: BusinessId,
    pub business: String,
    pub role: UserRole,
    pub status: UserStatus,
    /// Display string; "Never" until the first login.
    pub last_login: String,
}

/// A review collected for a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub business_id: BusinessId,
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub platform: ReviewPlatform,
    pub date: NaiveDate,
}

// =============================================================================
// Listing
// =============================================================================

/// Search box and status dropdown on the business list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BusinessFilter {
    pub q: String,
    pub status: String,
}

impl BusinessFilter {
    /// Case-insensitive match on name or category, plus an exact status match
    /// when one is selected. Unknown statuses match nothing.
    #[must_use]
    pub fn matches(&self, business: &Business) -> bool {
        let query = self.q.trim().to_lowercase();
        let text_ok = query.is_empty()
            || business.name.to_lowercase().contains(&query)
            || business.category.to_lowercase().contains(&query);

        let status_ok = match self.status.trim() {
            "" | "all" => true,
            other => other
                .parse::<BusinessStatus>()
                .is_ok_and(|status| status == business.status),
        };

        text_ok && status_ok
    }
}

// =============================================================================
// Business Edit
// =============================================================================

/// Edit-business form as posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BusinessEdit {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub description: String,
    pub status: String,
    /// Checkbox: present ("on") when checked, absent otherwise.
    pub review_gating: Option<String>,
}

impl BusinessEdit {
    /// Form prefilled from a business.
    #[must_use]
    pub fn from_business(business: &Business) -> Self {
        Self {
            name: business.name.clone(),
            email: business.email.clone(),
            phone: business.phone.clone(),
            address: business.address.clone(),
            description: business.description.clone(),
            status: business.status.to_string(),
            review_gating: business.review_gating.then(|| "on".to_string()),
        }
    }

    #[must_use]
    pub const fn gating_checked(&self) -> bool {
        self.review_gating.is_some()
    }

    /// Per-field messages; empty when the form can be saved.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Business name is required");
        if errors.require("email", &self.email, "Email is required")
            && Email::parse(self.email.trim()).is_err()
        {
            errors.add("email", "Email is invalid");
        }
        errors.require("phone", &self.phone, "Phone number is required");
        errors.require("address", &self.address, "Address is required");
        if self.status.parse::<BusinessStatus>().is_err() {
            errors.add("status", "Select a valid status");
        }
        errors
    }

    /// Whether saving would change anything on `business`.
    #[must_use]
    pub fn has_changes(&self, business: &Business) -> bool {
        *self != Self::from_business(business)
    }

    /// Write the form onto `business`.
    ///
    /// # Errors
    ///
    /// Returns the validation messages and leaves `business` untouched.
    pub fn apply_to(&self, business: &mut Business) -> Result<(), FieldErrors> {
        self.validate().into_result()?;
        business.name = self.name.trim().to_string();
        business.email = self.email.trim().to_string();
        business.phone = self.phone.trim().to_string();
        business.address = self.address.trim().to_string();
        business.description = self.description.trim().to_string();
        if let Ok(status) = self.status.parse() {
            business.status = status;
        }
        business.review_gating = self.gating_checked();
        Ok(())
    }
}

// =============================================================================
// New User
// =============================================================================

/// Add-user form as posted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUserForm {
    pub full_name: String,
    pub email: String,
    pub business_id: String,
    pub role: String,
}

impl NewUserForm {
    /// Validate against the current business list and build the user.
    ///
    /// Only active businesses can receive new users. An unknown role falls
    /// back to staff, the form's default.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when anything is missing or invalid.
    pub fn into_user(self, id: UserId, businesses: &[Business]) -> Result<User, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("full_name", &self.full_name, "Full name is required");
        if errors.require("email", &self.email, "Email is required")
            && Email::parse(self.email.trim()).is_err()
        {
            errors.add("email", "Email is invalid");
        }

        let business = self
            .business_id
            .parse::<BusinessId>()
            .ok()
            .and_then(|wanted| businesses.iter().find(|b| b.id == wanted))
            .filter(|b| b.status == BusinessStatus::Active);
        if business.is_none() {
            errors.add("business_id", "Business is required");
        }
        errors.into_result()?;

        let Some(business) = business else {
            return Err(FieldErrors::new());
        };

        Ok(User {
            id,
            name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            business_id: business.id,
            business: business.name.clone(),
            role: self.role.parse().unwrap_or_default(),
            status: UserStatus::Active,
            last_login: "Never".to_string(),
        })
    }
}
