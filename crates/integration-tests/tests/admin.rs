//! Admin dashboard: business list, business edit and user management.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use reviewhut_integration_tests::{TestApp, body, location};

fn edit_form<'a>(overrides: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut form = vec![
        ("name", "Doner Hut"),
        ("email", "contact@donerhut.com"),
        ("phone", "+1 (555) 123-4567"),
        ("address", "123 Business St, City, State 12345"),
        ("description", "A business description would go here."),
        ("status", "active"),
        ("review_gating", "on"),
    ];
    for (key, value) in overrides {
        if let Some(field) = form.iter_mut().find(|(k, _)| k == key) {
            field.1 = *value;
        }
    }
    form
}

#[tokio::test]
async fn test_dashboard_lists_pending_businesses() {
    let app = TestApp::spawn().await;

    let response = app.get("/admin/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body(response).await.contains("Urban Threads"));
}

#[tokio::test]
async fn test_business_list_search_and_status() {
    let app = TestApp::spawn().await;

    let html = body(app.get("/admin/businesses").await).await;
    for name in ["Doner Hut", "Coastal Coffee", "Urban Threads", "Green Leaf Landscaping"] {
        assert!(html.contains(name), "missing {name}");
    }

    let html = body(app.get("/admin/businesses?q=coffee&status=all").await).await;
    assert!(html.contains("Coastal Coffee"));
    assert!(!html.contains("Doner Hut"));

    // Category matches as well as name.
    let html = body(app.get("/admin/businesses?q=SERVICE").await).await;
    assert!(html.contains("Bright Smile Dental"));
    assert!(html.contains("Green Leaf Landscaping"));
    assert!(!html.contains("PixelForge Studio"));

    let html = body(app.get("/admin/businesses?status=suspended").await).await;
    assert!(html.contains("Green Leaf Landscaping"));
    assert!(!html.contains("Bright Smile Dental"));

    let html = body(app.get("/admin/businesses?q=nothing-like-this").await).await;
    assert!(html.contains("No businesses match your search."));
}

#[tokio::test]
async fn test_edit_rejects_invalid_fields() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/admin/businesses/1/edit",
            &edit_form(&[("name", " "), ("email", "not-an-email"), ("phone", "")]),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body(response).await;
    assert!(html.contains("Business name is required"));
    assert!(html.contains("Email is invalid"));
    assert!(html.contains("Phone number is required"));
    assert!(!html.contains("Address is required"));
    // The rejected input is kept in the form.
    assert!(html.contains("not-an-email"));

    let html = body(app.get("/admin/businesses").await).await;
    assert!(html.contains("Doner Hut"));
}

#[tokio::test]
async fn test_edit_saves_and_reports_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/admin/businesses/1/edit",
            &edit_form(&[("name", "Doner Hut Express"), ("status", "suspended")]),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/businesses?success=updated");

    let html = body(app.get(&location(&response)).await).await;
    assert!(html.contains("Business updated successfully."));
    assert!(html.contains("Doner Hut Express"));

    let html = body(app.get("/admin/businesses?status=suspended").await).await;
    assert!(html.contains("Doner Hut Express"));

    // Users of the business show the new name.
    let html = body(app.get("/admin/users").await).await;
    assert!(html.contains("Doner Hut Express"));
}

#[tokio::test]
async fn test_back_without_changes_leaves_immediately() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/admin/businesses/2/back", &edit_form(&[
        ("name", "Coastal Coffee"),
        ("email", "contact@coastalcoffee.com"),
    ]))
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/businesses");
}

#[tokio::test]
async fn test_back_with_changes_asks_to_discard() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/admin/businesses/1/back", &edit_form(&[("phone", "+1 555 000 0000")]))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body(response).await;
    assert!(html.contains("Discard changes?"));
    assert!(html.contains("+1 555 000 0000"));

    // Nothing was saved.
    let html = body(app.get("/admin/businesses/1/edit").await).await;
    assert!(html.contains("+1 (555) 123-4567"));
    assert!(!html.contains("Discard changes?"));
}

#[tokio::test]
async fn test_unknown_business_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.get("/admin/businesses/999/edit").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body(response).await.contains("Business Not Found"));

    let response = app
        .post_form("/admin/businesses/999/edit", &edit_form(&[]))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/admin/users",
            &[("full_name", ""), ("email", "dana"), ("business_id", ""), ("role", "staff")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body(response).await;
    assert!(html.contains("Full name is required"));
    assert!(html.contains("Email is invalid"));
    assert!(html.contains("Business is required"));

    // Pending and suspended businesses cannot receive users.
    for business_id in ["4", "6"] {
        let response = app
            .post_form(
                "/admin/users",
                &[
                    ("full_name", "Dana Smith"),
                    ("email", "dana@example.com"),
                    ("business_id", business_id),
                    ("role", "owner"),
                ],
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body(response).await.contains("Business is required"));
    }
}

#[tokio::test]
async fn test_create_user() {
    let app = TestApp::spawn().await;

    let html = body(app.get("/admin/users").await).await;
    assert!(html.contains("Ali Kaya"));
    assert!(!html.contains("Urban Threads"), "pending business offered");

    let response = app
        .post_form(
            "/admin/users",
            &[
                ("full_name", "Dana Smith"),
                ("email", "dana@coastalcoffee.com"),
                ("business_id", "2"),
                ("role", "manager"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/users?success=created");

    let html = body(app.get(&location(&response)).await).await;
    assert!(html.contains("User created successfully."));
    assert!(html.contains("Dana Smith"));
    assert!(html.contains("dana@coastalcoffee.com"));
}
