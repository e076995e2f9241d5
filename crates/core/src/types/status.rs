//! Status and role enums for directory entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a business account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    #[default]
    Active,
    Pending,
    Suspended,
}

impl BusinessStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::Active, Self::Pending, Self::Suspended];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Suspended => "Suspended",
        }
    }
}

impl std::fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Pending => write!(f, "pending"),
            Self::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for BusinessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "suspended" => Ok(Self::Suspended),
            _ => Err(format!("invalid business status: {s}")),
        }
    }
}

/// Role a user holds within the business they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Manager,
    #[default]
    Staff,
}

impl UserRole {
    /// All roles in display order.
    pub const ALL: [Self; 3] = [Self::Owner, Self::Manager, Self::Staff];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Manager => "Manager",
            Self::Staff => "Staff",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Manager => write!(f, "manager"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Whether a user account can sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// Public review site a review was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewPlatform {
    Google,
    Facebook,
    Yelp,
    TripAdvisor,
}

impl std::fmt::Display for ReviewPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "Google"),
            Self::Facebook => write!(f, "Facebook"),
            Self::Yelp => write!(f, "Yelp"),
            Self::TripAdvisor => write!(f, "TripAdvisor"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_business_status_roundtrips_through_display() {
        for status in BusinessStatus::ALL {
            let parsed: BusinessStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("closed".parse::<BusinessStatus>().is_err());
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!("owner".parse::<UserRole>().unwrap(), UserRole::Owner);
        assert_eq!(UserRole::default(), UserRole::Staff);
        assert!("admin".parse::<UserRole>().is_err());
    }
}
