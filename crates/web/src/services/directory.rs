//! In-memory directory of businesses, users and reviews.
//!
//! Seeded with sample records at startup and shared by every session.
//! Edits are kept until the process exits.

use chrono::NaiveDate;
use reviewhut_core::directory::{
    Business, BusinessEdit, BusinessFilter, NewUserForm, Review, User,
};
use reviewhut_core::{
    BusinessId, BusinessStatus, FieldErrors, ReviewId, ReviewPlatform, UserId, UserRole,
    UserStatus,
};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from directory updates.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("business {0} not found")]
    BusinessNotFound(BusinessId),
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
}

/// Totals shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryStats {
    pub total_businesses: usize,
    pub active_businesses: usize,
    pub pending_businesses: usize,
    pub total_users: usize,
    pub total_reviews: u32,
    pub average_rating: f32,
}

#[derive(Debug, Default)]
struct Records {
    businesses: Vec<Business>,
    users: Vec<User>,
    reviews: Vec<Review>,
}

/// Shared directory behind an async read-write lock.
#[derive(Debug, Default)]
pub struct DirectoryStore {
    records: RwLock<Records>,
}

impl DirectoryStore {
    /// Store preloaded with the sample directory.
    #[must_use]
    pub fn seeded() -> Self {
        let businesses = seed_businesses();
        let users = seed_users(&businesses);
        let reviews = seed_reviews();
        Self {
            records: RwLock::new(Records {
                businesses,
                users,
                reviews,
            }),
        }
    }

    /// Businesses matching `filter`, in id order.
    pub async fn businesses(&self, filter: &BusinessFilter) -> Vec<Business> {
        let records = self.records.read().await;
        records
            .businesses
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect()
    }

    /// Every business, for dropdowns.
    pub async fn all_businesses(&self) -> Vec<Business> {
        self.records.read().await.businesses.clone()
    }

    pub async fn business(&self, id: BusinessId) -> Option<Business> {
        let records = self.records.read().await;
        records.businesses.iter().find(|b| b.id == id).cloned()
    }

    /// Validate and save an edit.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::BusinessNotFound`] for an unknown id and
    /// [`DirectoryError::Invalid`] when the form fails validation.
    pub async fn update_business(
        &self,
        id: BusinessId,
        edit: &BusinessEdit,
    ) -> Result<Business, DirectoryError> {
        let mut records = self.records.write().await;
        let business = records
            .businesses
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(DirectoryError::BusinessNotFound(id))?;
        edit.apply_to(business).map_err(DirectoryError::Invalid)?;
        let updated = business.clone();

        // Users show the business name; keep it in step with renames.
        for user in records.users.iter_mut().filter(|u| u.business_id == id) {
            user.business.clone_from(&updated.name);
        }

        tracing::info!(business_id = %id, "Business updated");
        Ok(updated)
    }

    pub async fn users(&self) -> Vec<User> {
        self.records.read().await.users.clone()
    }

    /// Validate and add a user.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when the form is invalid.
    pub async fn add_user(&self, form: NewUserForm) -> Result<User, FieldErrors> {
        let mut records = self.records.write().await;
        let next_id = records
            .users
            .iter()
            .map(|u| u.id.as_i32())
            .max()
            .unwrap_or(0)
            + 1;
        let user = form.into_user(UserId::new(next_id), &records.businesses)?;
        records.users.push(user.clone());
        tracing::info!(user_id = %user.id, business_id = %user.business_id, "User created");
        Ok(user)
    }

    /// Reviews for one business, newest first.
    pub async fn reviews_for(&self, business_id: BusinessId) -> Vec<Review> {
        let records = self.records.read().await;
        let mut reviews: Vec<Review> = records
            .reviews
            .iter()
            .filter(|r| r.business_id == business_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.date.cmp(&a.date));
        reviews
    }

    pub async fn stats(&self) -> DirectoryStats {
        let records = self.records.read().await;
        let count = |status| {
            records
                .businesses
                .iter()
                .filter(|b| b.status == status)
                .count()
        };
        let total_reviews: u32 = records.businesses.iter().map(|b| b.review_count).sum();
        let rated: Vec<f32> = records
            .businesses
            .iter()
            .filter(|b| b.review_count > 0)
            .map(|b| b.rating)
            .collect();
        #[allow(clippy::cast_precision_loss)] // a handful of businesses
        let average_rating = if rated.is_empty() {
            0.0
        } else {
            rated.iter().sum::<f32>() / rated.len() as f32
        };

        DirectoryStats {
            total_businesses: records.businesses.len(),
            active_businesses: count(BusinessStatus::Active),
            pending_businesses: count(BusinessStatus::Pending),
            total_users: records.users.len(),
            total_reviews,
            average_rating,
        }
    }
}

// =============================================================================
// Sample Data
// =============================================================================

/// The business the business dashboard shows.
pub const DEMO_BUSINESS_ID: BusinessId = BusinessId::new(1);

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seed_businesses() -> Vec<Business> {
    let rows = [
        (1, "Doner Hut", "Restaurant", BusinessStatus::Active, 4.6, 128, date(2024, 1, 12)),
        (2, "Coastal Coffee", "Restaurant", BusinessStatus::Active, 4.3, 86, date(2024, 2, 3)),
        (3, "Bright Smile Dental", "Service", BusinessStatus::Active, 4.8, 214, date(2024, 2, 20)),
        (4, "Urban Threads", "Retail", BusinessStatus::Pending, 0.0, 0, date(2024, 4, 8)),
        (5, "PixelForge Studio", "Tech", BusinessStatus::Active, 4.1, 37, date(2024, 5, 17)),
        (6, "Green Leaf Landscaping", "Service", BusinessStatus::Suspended, 3.2, 19, date(2024, 6, 1)),
    ];

    rows.into_iter()
        .map(|(id, name, category, status, rating, review_count, joined)| Business {
            id: BusinessId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            status,
            email: format!("contact@{}.com", name.to_lowercase().replace(' ', "")),
            phone: "+1 (555) 123-4567".to_string(),
            address: "123 Business St, City, State 12345".to_string(),
            description: "A business description would go here.".to_string(),
            rating,
            review_count,
            review_gating: true,
            joined,
        })
        .collect()
}

fn seed_users(businesses: &[Business]) -> Vec<User> {
    let rows = [
        (1, "Ali Kaya", "ali@donerhut.com", 1, UserRole::Owner, UserStatus::Active, "2 hours ago"),
        (2, "Maria Lopez", "maria@donerhut.com", 1, UserRole::Manager, UserStatus::Active, "Yesterday"),
        (3, "Tom Becker", "tom@coastalcoffee.com", 2, UserRole::Owner, UserStatus::Active, "3 days ago"),
        (4, "Priya Nair", "priya@brightsmiledental.com", 3, UserRole::Owner, UserStatus::Active, "Today"),
        (5, "Sam Reed", "sam@brightsmiledental.com", 3, UserRole::Staff, UserStatus::Inactive, "Never"),
        (6, "Jo Park", "jo@pixelforgestudio.com", 5, UserRole::Owner, UserStatus::Active, "1 week ago"),
    ];

    rows.into_iter()
        .map(|(id, name, email, business_id, role, status, last_login)| {
            let business_id = BusinessId::new(business_id);
            let business = businesses
                .iter()
                .find(|b| b.id == business_id)
                .map(|b| b.name.clone())
                .unwrap_or_default();
            User {
                id: UserId::new(id),
                name: name.to_string(),
                email: email.to_string(),
                business_id,
                business,
                role,
                status,
                last_login: last_login.to_string(),
            }
        })
        .collect()
}

fn seed_reviews() -> Vec<Review> {
    let rows = [
        (1, 1, "Emma W.", 5, "Best doner in town, and the staff are lovely.", ReviewPlatform::Google, date(2024, 6, 14)),
        (2, 1, "James T.", 4, "Great food, a bit of a wait at lunch.", ReviewPlatform::Google, date(2024, 6, 11)),
        (3, 1, "Sofia R.", 5, "Generous portions and fresh bread.", ReviewPlatform::Facebook, date(2024, 6, 2)),
        (4, 1, "Liam K.", 3, "Good, but the fries were cold.", ReviewPlatform::Yelp, date(2024, 5, 28)),
        (5, 1, "Noah B.", 5, "Our go-to Friday dinner spot.", ReviewPlatform::TripAdvisor, date(2024, 5, 20)),
        (6, 2, "Ava M.", 4, "Lovely flat white.", ReviewPlatform::Google, date(2024, 6, 9)),
    ];

    rows.into_iter()
        .map(|(id, business_id, author, rating, comment, platform, date)| Review {
            id: ReviewId::new(id),
            business_id: BusinessId::new(business_id),
            author: author.to_string(),
            rating,
            comment: comment.to_string(),
            platform,
            date,
        })
        .collect()
}
