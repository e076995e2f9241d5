//! Login, logout and registration against the fake backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use reviewhut_integration_tests::{BackendBehavior, TestApp, location};

fn backend_role(role: Option<&str>) -> BackendBehavior {
    BackendBehavior {
        login_role: role.map(String::from),
        ..BackendBehavior::default()
    }
}

const CREDENTIALS: &[(&str, &str)] = &[("email", "owner@donerhut.com"), ("password", "hunter22")];

#[tokio::test]
async fn test_business_user_login_sets_session() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/login", CREDENTIALS).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/business/dashboard");

    let logins = app.logins();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0]["email"], "owner@donerhut.com");
    assert_eq!(logins[0]["password"], "hunter22");

    let body = app.get("/business/dashboard").await.text().await.unwrap();
    assert!(body.contains("owner@donerhut.com"));
}

#[tokio::test]
async fn test_other_roles_are_refused() {
    let app = TestApp::spawn_with(backend_role(Some("ADMIN"))).await;

    let response = app.post_form("/login", CREDENTIALS).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response.text().await.unwrap();
    assert!(body.contains("Only business users can log in here."));

    let body = app.get("/business/dashboard").await.text().await.unwrap();
    assert!(!body.contains("owner@donerhut.com"));
}

#[tokio::test]
async fn test_backend_rejection_shows_generic_error() {
    let app = TestApp::spawn_with(backend_role(None)).await;

    let response = app.post_form("/login", CREDENTIALS).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.text().await.unwrap();
    assert!(body.contains("Login failed. Please check your credentials and try again."));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::spawn().await;
    app.post_form("/login", CREDENTIALS).await;

    let response = app.post_form("/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let body = app.get("/business/dashboard").await.text().await.unwrap();
    assert!(!body.contains("owner@donerhut.com"));
}

#[tokio::test]
async fn test_registration_password_mismatch() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/register",
            &[
                ("account_type", "business"),
                ("business_name", "Doner Hut"),
                ("full_name", "Ali Yilmaz"),
                ("email", "ali@donerhut.com"),
                ("password", "one-password"),
                ("confirm_password", "another-password"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Passwords do not match"));
    assert!(app.registrations().is_empty());
}

#[tokio::test]
async fn test_registration_success_redirects_to_login() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/register",
            &[
                ("account_type", "business"),
                ("business_name", "Doner Hut"),
                ("full_name", "Ali Yilmaz"),
                ("email", "ali+owner@donerhut.com"),
                ("password", "one-password"),
                ("confirm_password", "one-password"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert_eq!(
        target,
        "/login?success=registered&email=ali%2Bowner%40donerhut.com"
    );

    let registrations = app.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0]["businessName"], "Doner Hut");
    assert_eq!(registrations[0]["accountType"], "business");

    let body = app.get(&target).await.text().await.unwrap();
    assert!(body.contains("Account created"));
    assert!(body.contains("ali+owner@donerhut.com"));
}

#[tokio::test]
async fn test_legacy_aliases_redirect() {
    let app = TestApp::spawn().await;

    let response = app.get("/login-review").await;
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(location(&response), "/login");

    let response = app.get("/register-review").await;
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(location(&response), "/register");
}
