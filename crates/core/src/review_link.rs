//! Review-link settings and review gating.
//!
//! A business shares one review link with its customers. The landing page
//! asks for a star rating first; with gating enabled only 4-5 star
//! experiences are sent on to the public review site.

use rand::Rng;
use serde::{Deserialize, Serialize};
use url::Url;

/// Host every generated review link lives under.
pub const DEFAULT_LINK_BASE: &str = "https://go.reviewhut.com";

/// Length of a generated link slug.
pub const SLUG_LENGTH: usize = 6;

const SLUG_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Lowest rating that still counts as a positive experience.
const POSITIVE_THRESHOLD: u8 = 4;

/// Errors from review-link operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewLinkError {
    /// Star ratings run from 1 to 5.
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    /// The saved URL was blank.
    #[error("review link URL cannot be empty")]
    EmptyUrl,
    /// The saved URL is not an absolute http(s) link.
    #[error("review link must be an absolute http(s) URL")]
    InvalidUrl,
    /// The uploaded file is not an image.
    #[error("uploaded file must be an image, got {0}")]
    NotAnImage(String),
}

/// A 1-5 star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns [`ReviewLinkError::RatingOutOfRange`] outside 1-5.
    pub fn new(stars: u8) -> Result<Self, ReviewLinkError> {
        if stars >= Self::MIN && stars <= Self::MAX {
            Ok(Self(stars))
        } else {
            Err(ReviewLinkError::RatingOutOfRange(stars))
        }
    }

    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 >= POSITIVE_THRESHOLD
    }

    /// "You selected 1 star" / "You selected 4 stars".
    #[must_use]
    pub fn caption(self) -> String {
        if self.0 == 1 {
            "You selected 1 star".to_string()
        } else {
            format!("You selected {} stars", self.0)
        }
    }
}

impl TryFrom<u8> for StarRating {
    type Error = ReviewLinkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

/// Where "Leave a review" sends the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDestination {
    /// The public review link, opened in a new tab.
    ReviewLink(String),
    /// Back to the site's home page.
    Home,
}

/// Uploaded preview image, kept as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewImage {
    data_url: String,
}

impl PreviewImage {
    /// Build a data URL from an already base64-encoded payload.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewLinkError::NotAnImage`] unless the content type is `image/*`.
    pub fn from_base64(content_type: &str, base64_payload: &str) -> Result<Self, ReviewLinkError> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(ReviewLinkError::NotAnImage(content_type));
        }
        Ok(Self {
            data_url: format!("data:{content_type};base64,{base64_payload}"),
        })
    }

    #[must_use]
    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// Which card on the settings page is in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditSection {
    Url,
    Title,
    Preview,
}

impl std::str::FromStr for EditSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(Self::Url),
            "title" => Ok(Self::Title),
            "preview" => Ok(Self::Preview),
            _ => Err(format!("unknown section: {s}")),
        }
    }
}

/// Review-link settings for one business, as edited on the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewLinkSettings {
    pub url: String,
    pub social_title: String,
    gating_enabled: bool,
    gating_confirm_open: bool,
    pub business_name: String,
    pub preview_text: String,
    pub preview_image: Option<PreviewImage>,
    rating: Option<StarRating>,
    link_base: String,
}

impl Default for ReviewLinkSettings {
    fn default() -> Self {
        Self::with_link_base(DEFAULT_LINK_BASE)
    }
}

impl ReviewLinkSettings {
    /// Default settings whose generated links live under `link_base`.
    #[must_use]
    pub fn with_link_base(link_base: &str) -> Self {
        let link_base = link_base.trim_end_matches('/').to_string();
        Self {
            url: format!("{link_base}/doner-hut"),
            social_title: "Do you want to leave us a review?".to_string(),
            gating_enabled: true,
            gating_confirm_open: false,
            business_name: "DONER HUT".to_string(),
            preview_text: "How was your experience with Doner Hut?".to_string(),
            preview_image: None,
            rating: None,
            link_base,
        }
    }

    #[must_use]
    pub const fn gating_enabled(&self) -> bool {
        self.gating_enabled
    }

    /// Whether the "disable review gating?" dialog is showing.
    #[must_use]
    pub const fn gating_confirm_open(&self) -> bool {
        self.gating_confirm_open
    }

    #[must_use]
    pub const fn rating(&self) -> Option<StarRating> {
        self.rating
    }

    /// Commit an edited URL.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewLinkError::EmptyUrl`] for a blank value and
    /// [`ReviewLinkError::InvalidUrl`] unless it is an absolute http(s) URL
    /// with a host and no whitespace or control characters. The current URL
    /// is kept on error.
    pub fn save_url(&mut self, url: &str) -> Result<(), ReviewLinkError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ReviewLinkError::EmptyUrl);
        }
        // Url::parse quietly strips or escapes these, so check the raw input.
        if url.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(ReviewLinkError::InvalidUrl);
        }
        let parsed = Url::parse(url).map_err(|_| ReviewLinkError::InvalidUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ReviewLinkError::InvalidUrl);
        }
        self.url = url.to_string();
        Ok(())
    }

    /// Replace the URL with a freshly generated `<base>/<6 chars>` link.
    ///
    /// Purely local; nothing is registered with the backend.
    pub fn generate_new_link<R: Rng>(&mut self, rng: &mut R) -> &str {
        let slug = generate_slug(rng);
        self.url = format!("{}/{slug}", self.link_base);
        &self.url
    }

    /// Commit an edited social preview title. Blank titles are kept as-is.
    pub fn save_title(&mut self, title: &str) {
        self.social_title = title.trim().to_string();
    }

    /// Commit the preview editor. `image` replaces the current one only when given.
    pub fn save_preview(&mut self, business_name: &str, preview_text: &str, image: Option<PreviewImage>) {
        self.business_name = business_name.trim().to_string();
        self.preview_text = preview_text.trim().to_string();
        if image.is_some() {
            self.preview_image = image;
        }
    }

    /// Flip the gating switch.
    ///
    /// Turning gating off needs confirmation, so this only opens the dialog;
    /// turning it back on is immediate.
    pub fn toggle_gating(&mut self) {
        if self.gating_enabled {
            self.gating_confirm_open = true;
        } else {
            self.gating_enabled = true;
        }
    }

    /// Confirm the dialog: gating off, dialog closed.
    pub fn confirm_disable_gating(&mut self) {
        self.gating_enabled = false;
        self.gating_confirm_open = false;
    }

    /// Cancel the dialog: gating untouched, dialog closed.
    pub fn cancel_disable_gating(&mut self) {
        self.gating_confirm_open = false;
    }

    /// Select a star on the preview page.
    pub fn select_rating(&mut self, rating: StarRating) {
        self.rating = Some(rating);
    }

    /// Where "Leave a review" goes for the currently selected rating.
    ///
    /// Nothing is left without a rating, gated or not.
    #[must_use]
    pub fn leave_review(&self) -> ReviewDestination {
        match self.rating {
            Some(rating) if !self.gating_enabled || rating.is_positive() => {
                ReviewDestination::ReviewLink(self.url.clone())
            }
            _ => ReviewDestination::Home,
        }
    }
}

/// Random lowercase alphanumeric slug of [`SLUG_LENGTH`] characters.
pub fn generate_slug<R: Rng>(rng: &mut R) -> String {
    (0..SLUG_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..SLUG_ALPHABET.len());
            SLUG_ALPHABET.get(idx).copied().map_or('0', char::from)
        })
        .collect()
}
