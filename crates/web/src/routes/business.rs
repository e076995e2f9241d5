//! Business dashboard route handlers.
//!
//! The overview and reviews pages read the shared directory. Review-link
//! settings are per visitor and live in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reviewhut_core::directory::{Business, Review};
use reviewhut_core::review_link::{
    EditSection, PreviewImage, ReviewDestination, ReviewLinkError, ReviewLinkSettings, StarRating,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Sidebar, session_keys};
use crate::services::directory::DEMO_BUSINESS_ID;
use crate::state::AppState;

const RECENT_REVIEWS: usize = 3;

// =============================================================================
// Overview
// =============================================================================

/// Business dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "business/dashboard.html")]
pub struct DashboardTemplate {
    pub sidebar: Sidebar,
    pub business: Business,
    pub recent_reviews: Vec<Review>,
    pub positive_reviews: usize,
    pub link_url: String,
    pub gating_enabled: bool,
}

/// Display the business overview.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(account): OptionalAuth,
) -> Result<impl IntoResponse> {
    let business = demo_business(&state).await?;
    let reviews = state.directory().reviews_for(business.id).await;
    let settings = load_settings(&state, &session).await?;

    Ok(DashboardTemplate {
        sidebar: Sidebar::business("/business/dashboard", account.as_ref()),
        positive_reviews: reviews.iter().filter(|r| r.rating >= 4).count(),
        recent_reviews: reviews.into_iter().take(RECENT_REVIEWS).collect(),
        business,
        gating_enabled: settings.gating_enabled(),
        link_url: settings.url,
    })
}

// =============================================================================
// Reviews
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub rating: Option<u8>,
}

/// Reviews list template.
#[derive(Template, WebTemplate)]
#[template(path = "business/reviews.html")]
pub struct ReviewsTemplate {
    pub sidebar: Sidebar,
    pub business: Business,
    pub reviews: Vec<Review>,
    pub rating_filter: Option<u8>,
}

/// Display the review list, optionally narrowed to one star rating.
#[instrument(skip(state, account))]
pub async fn reviews(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    Query(query): Query<ReviewsQuery>,
) -> Result<impl IntoResponse> {
    let business = demo_business(&state).await?;
    let rating_filter = query.rating.filter(|r| StarRating::new(*r).is_ok());
    let reviews = state
        .directory()
        .reviews_for(business.id)
        .await
        .into_iter()
        .filter(|r| rating_filter.is_none_or(|stars| r.rating == stars))
        .collect();

    Ok(ReviewsTemplate {
        sidebar: Sidebar::business("/business/reviews", account.as_ref()),
        business,
        reviews,
        rating_filter,
    })
}

// =============================================================================
// Review Link Settings
// =============================================================================

/// Query parameters for the settings page.
#[derive(Debug, Deserialize)]
pub struct ReviewLinkQuery {
    pub edit: Option<String>,
    pub error: Option<String>,
}

/// One star on the rating preview.
pub struct StarButton {
    pub value: u8,
    pub filled: bool,
}

/// Review-link settings template.
#[derive(Template, WebTemplate)]
#[template(path = "business/review_link.html")]
pub struct ReviewLinkTemplate {
    pub sidebar: Sidebar,
    pub settings: ReviewLinkSettings,
    pub editing_url: bool,
    pub editing_title: bool,
    pub editing_preview: bool,
    pub stars: Vec<StarButton>,
    pub rating_caption: Option<String>,
    /// Whether "Leave a review" will open the review link.
    pub opens_link: bool,
    pub error: Option<&'static str>,
}

fn error_message(code: &str) -> Option<&'static str> {
    match code {
        "empty_url" => Some("Review link URL cannot be empty."),
        "invalid_url" => Some("Enter a full URL starting with https://"),
        "not_image" => Some("Please upload an image file."),
        "rating" => Some("Select a rating between 1 and 5 stars."),
        _ => None,
    }
}

fn star_buttons(rating: Option<StarRating>) -> Vec<StarButton> {
    let selected = rating.map_or(0, StarRating::stars);
    (StarRating::MIN..=StarRating::MAX)
        .map(|value| StarButton {
            value,
            filled: value <= selected,
        })
        .collect()
}

async fn load_settings(state: &AppState, session: &Session) -> Result<ReviewLinkSettings> {
    Ok(session
        .get::<ReviewLinkSettings>(session_keys::REVIEW_LINK_SETTINGS)
        .await?
        .unwrap_or_else(|| ReviewLinkSettings::with_link_base(&state.config().review_link_base)))
}

async fn save_settings(session: &Session, settings: &ReviewLinkSettings) -> Result<()> {
    session
        .insert(session_keys::REVIEW_LINK_SETTINGS, settings)
        .await?;
    Ok(())
}

async fn demo_business(state: &AppState) -> Result<Business> {
    state
        .directory()
        .business(DEMO_BUSINESS_ID)
        .await
        .ok_or_else(|| AppError::NotFound("Business not found".to_string()))
}

/// Display the review-link settings page.
#[instrument(skip(state, session, account))]
pub async fn review_link(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(account): OptionalAuth,
    Query(query): Query<ReviewLinkQuery>,
) -> Result<impl IntoResponse> {
    let settings = load_settings(&state, &session).await?;
    let editing = query
        .edit
        .as_deref()
        .and_then(|s| s.parse::<EditSection>().ok());
    let rating = settings.rating();

    Ok(ReviewLinkTemplate {
        sidebar: Sidebar::business("/business/review-link", account.as_ref()),
        editing_url: editing == Some(EditSection::Url),
        editing_title: editing == Some(EditSection::Title),
        editing_preview: editing == Some(EditSection::Preview),
        stars: star_buttons(rating),
        rating_caption: rating.map(StarRating::caption),
        opens_link: matches!(settings.leave_review(), ReviewDestination::ReviewLink(_)),
        error: query.error.as_deref().and_then(error_message),
        settings,
    })
}

#[derive(Debug, Deserialize)]
pub struct UrlForm {
    pub url: String,
}

/// Commit an edited review-link URL.
#[instrument(skip_all)]
pub async fn save_url(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UrlForm>,
) -> Result<Redirect> {
    let mut settings = load_settings(&state, &session).await?;
    match settings.save_url(&form.url) {
        Ok(()) => {
            save_settings(&session, &settings).await?;
            Ok(Redirect::to("/business/review-link"))
        }
        Err(ReviewLinkError::EmptyUrl) => Ok(Redirect::to(
            "/business/review-link?edit=url&error=empty_url",
        )),
        Err(ReviewLinkError::InvalidUrl) => Ok(Redirect::to(
            "/business/review-link?edit=url&error=invalid_url",
        )),
        Err(e) => Err(AppError::BadRequest(e.to_string())),
    }
}

/// Replace the URL with a freshly generated link.
#[instrument(skip_all)]
pub async fn generate_link(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let mut settings = load_settings(&state, &session).await?;
    let url = settings.generate_new_link(&mut rand::rng()).to_string();
    save_settings(&session, &settings).await?;
    add_breadcrumb("review_link", "Generated new link", &[("url", url.as_str())]);
    Ok(Redirect::to("/business/review-link"))
}

#[derive(Debug, Deserialize)]
pub struct TitleForm {
    pub title: String,
}

/// Commit an edited social preview title.
#[instrument(skip_all)]
pub async fn save_title(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<TitleForm>,
) -> Result<Redirect> {
    let mut settings = load_settings(&state, &session).await?;
    settings.save_title(&form.title);
    save_settings(&session, &settings).await?;
    Ok(Redirect::to("/business/review-link"))
}

/// Flip the gating switch. Turning it off only opens the confirmation dialog.
#[instrument(skip_all)]
pub async fn toggle_gating(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let mut settings = load_settings(&state, &session).await?;
    settings.toggle_gating();
    save_settings(&session, &settings).await?;
    Ok(Redirect::to("/business/review-link"))
}

#[instrument(skip_all)]
pub async fn confirm_gating(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let mut settings = load_settings(&state, &session).await?;
    settings.confirm_disable_gating();
    save_settings(&session, &settings).await?;
    add_breadcrumb("review_link", "Review gating disabled", &[]);
    tracing::info!("Review gating disabled");
    Ok(Redirect::to("/business/review-link"))
}

#[instrument(skip_all)]
pub async fn cancel_gating(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let mut settings = load_settings(&state, &session).await?;
    settings.cancel_disable_gating();
    save_settings(&session, &settings).await?;
    Ok(Redirect::to("/business/review-link"))
}

/// Commit the preview editor.
///
/// Fields: `business_name`, `preview_text` and an optional `image` file.
/// An empty file input leaves the current image in place.
#[instrument(skip_all)]
pub async fn save_preview(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let mut settings = load_settings(&state, &session).await?;
    let mut business_name = settings.business_name.clone();
    let mut preview_text = settings.preview_text.clone();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "business_name" => {
                business_name = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
            }
            "preview_text" => {
                preview_text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
            }
            "image" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if bytes.is_empty() {
                    continue;
                }
                match PreviewImage::from_base64(&content_type, &STANDARD.encode(&bytes)) {
                    Ok(preview) => image = Some(preview),
                    Err(e) => {
                        tracing::debug!(error = %e, "Rejected preview upload");
                        return Ok(Redirect::to(
                            "/business/review-link?edit=preview&error=not_image",
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    settings.save_preview(&business_name, &preview_text, image);
    save_settings(&session, &settings).await?;
    Ok(Redirect::to("/business/review-link"))
}

#[derive(Debug, Deserialize)]
pub struct RatingForm {
    pub rating: u8,
}

/// Select a star on the preview.
#[instrument(skip(state, session))]
pub async fn select_rating(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RatingForm>,
) -> Result<Redirect> {
    let Ok(rating) = StarRating::new(form.rating) else {
        return Ok(Redirect::to("/business/review-link?error=rating"));
    };
    let mut settings = load_settings(&state, &session).await?;
    settings.select_rating(rating);
    save_settings(&session, &settings).await?;
    Ok(Redirect::to("/business/review-link"))
}

/// Follow "Leave a review" for the selected rating.
#[instrument(skip_all)]
pub async fn leave_review(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let settings = load_settings(&state, &session).await?;
    match settings.leave_review() {
        ReviewDestination::ReviewLink(url) => Ok(Redirect::to(&url)),
        ReviewDestination::Home => Ok(Redirect::to("/")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert!(error_message("empty_url").is_some());
        assert!(error_message("invalid_url").is_some());
        assert!(error_message("not_image").is_some());
        assert!(error_message("anything").is_none());
    }

    #[test]
    fn test_star_buttons_fill_up_to_selection() {
        let filled: Vec<_> = star_buttons(StarRating::new(3).ok())
            .iter()
            .map(|s| s.filled)
            .collect();
        assert_eq!(filled, [true, true, true, false, false]);
        assert!(star_buttons(None).iter().all(|s| !s.filled));
    }
}
