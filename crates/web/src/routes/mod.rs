//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /pricing                - Home page
//! GET  /demo                   - Product demo
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /register               - Register page
//! POST /register               - Register action
//! POST /logout                 - Logout action
//! GET  /login-review           - Permanent redirect to /login
//! GET  /register-review        - Permanent redirect to /register
//!
//! # Business registration wizard
//! GET  /business-form          - Current step
//! POST /business-form/next     - Save step, advance when complete
//! POST /business-form/back     - Save step, go back
//! POST /business-form/submit   - Send to backend
//! POST /business-form/reset    - Discard the draft
//!
//! # Business dashboard
//! GET  /business/dashboard     - Overview
//! GET  /business/reviews       - Review list
//! GET  /business/review-link   - Review-link settings
//! POST /business/review-link/url            - Save URL
//! POST /business/review-link/generate       - Generate new link
//! POST /business/review-link/title          - Save social title
//! POST /business/review-link/gating         - Toggle review gating
//! POST /business/review-link/gating/confirm - Confirm disabling gating
//! POST /business/review-link/gating/cancel  - Keep gating on
//! POST /business/review-link/preview        - Save preview (multipart)
//! POST /business/review-link/rating         - Select star rating
//! POST /business/review-link/leave-review   - Follow "Leave a review"
//!
//! # Admin dashboard
//! GET  /admin/dashboard        - Overview
//! GET  /admin/businesses       - Business list (search + status filter)
//! GET  /admin/businesses/{id}/edit - Edit form
//! POST /admin/businesses/{id}/edit - Save edit
//! POST /admin/businesses/{id}/back - Leave edit form
//! GET  /admin/users            - User list and add-user form
//! POST /admin/users            - Add user
//! ```

pub mod admin;
pub mod auth;
pub mod business;
pub mod business_form;
pub mod home;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/login-review", get(auth::login_alias))
        .route("/register-review", get(auth::register_alias))
}

/// Create the registration wizard router.
pub fn business_form_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(business_form::show))
        .route("/next", post(business_form::next))
        .route("/back", post(business_form::back))
        .route("/submit", post(business_form::submit))
        .route("/reset", post(business_form::reset))
}

/// Create the business dashboard router.
pub fn business_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(business::dashboard))
        .route("/reviews", get(business::reviews))
        .route("/review-link", get(business::review_link))
        .route("/review-link/url", post(business::save_url))
        .route("/review-link/generate", post(business::generate_link))
        .route("/review-link/title", post(business::save_title))
        .route("/review-link/gating", post(business::toggle_gating))
        .route("/review-link/gating/confirm", post(business::confirm_gating))
        .route("/review-link/gating/cancel", post(business::cancel_gating))
        .route("/review-link/preview", post(business::save_preview))
        .route("/review-link/rating", post(business::select_rating))
        .route("/review-link/leave-review", post(business::leave_review))
}

/// Create the admin dashboard router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/businesses", get(admin::businesses))
        .route(
            "/businesses/{id}/edit",
            get(admin::edit_page).post(admin::save),
        )
        .route("/businesses/{id}/back", post(admin::back))
        .route("/users", get(admin::users).post(admin::create_user))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Marketing pages
        .route("/", get(home::home))
        .route("/pricing", get(home::home))
        .route("/demo", get(pages::demo))
        // Auth routes
        .merge(auth_routes())
        // Registration wizard
        .nest("/business-form", business_form_routes())
        // Dashboards
        .nest("/business", business_routes())
        .nest("/admin", admin_routes())
}
