//! Business registration wizard, end to end.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use reviewhut_integration_tests::{BackendBehavior, TestApp, location};

const STEP_ONE: &[(&str, &str)] = &[
    ("business_name", "Doner Hut"),
    ("location", "Berlin"),
    ("branch", "Kreuzberg"),
    ("business_type", "Other"),
    ("custom_business_type", "Food Truck"),
    ("branch_count", "2-5"),
];

const STEP_TWO: &[(&str, &str)] = &[
    ("contact_email", "hello@donerhut.com"),
    ("contact_phone", "+49 30 1234567"),
    ("whatsapp", ""),
    ("secondary_email", ""),
];

async fn next(app: &TestApp, form: &[(&str, &str)]) -> reqwest::Response {
    app.post_form("/business-form/next", form).await
}

/// Fill in every step and land on the review step.
async fn complete_wizard(app: &TestApp) {
    let steps: [&[(&str, &str)]; 4] = [
        STEP_ONE,
        STEP_TWO,
        &[],
        &[("description", "Best doner in town")],
    ];
    for form in steps {
        let response = next(app, form).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/business-form");
    }
}

#[tokio::test]
async fn test_wizard_starts_on_step_one() {
    let app = TestApp::spawn().await;

    let response = app.get("/business-form").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Step 1: Business Details"));
    assert!(body.contains(r#"aria-disabled="true""#));
}

#[tokio::test]
async fn test_incomplete_step_blocks_next() {
    let app = TestApp::spawn().await;

    let response = next(&app, &[("business_name", "Doner Hut"), ("business_type", "Other")]).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.unwrap();
    assert!(body.contains("Step 1: Business Details"));
    assert!(body.contains("Location is required"));
    assert!(body.contains("Please specify the business type"));
    assert!(body.contains("Branch count is required"));
    // What was typed survives the re-render.
    assert!(body.contains(r#"value="Doner Hut""#));
}

#[tokio::test]
async fn test_back_never_blocks_and_keeps_draft() {
    let app = TestApp::spawn().await;
    next(&app, STEP_ONE).await;

    // Step 2 is empty; back must still work.
    let response = app.post_form("/business-form/back", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = app.get("/business-form").await.text().await.unwrap();
    assert!(body.contains("Step 1: Business Details"));
    assert!(body.contains(r#"value="Kreuzberg""#));
    assert!(body.contains(r#"value="Food Truck""#));
}

#[tokio::test]
async fn test_contact_step_checks_formats() {
    let app = TestApp::spawn().await;
    next(&app, STEP_ONE).await;

    let response = next(
        &app,
        &[("contact_email", "not-an-email"), ("contact_phone", "call me")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.unwrap();
    assert!(body.contains("Enter a valid email address"));
    assert!(body.contains("Enter a valid phone number"));
}

#[tokio::test]
async fn test_full_flow_submits_once_and_resets() {
    let app = TestApp::spawn().await;
    complete_wizard(&app).await;

    let body = app.get("/business-form").await.text().await.unwrap();
    assert!(body.contains("Step 5: Review &amp; Submit") || body.contains("Step 5: Review &#38; Submit"));
    assert!(body.contains("Food Truck"));
    assert!(body.contains("hello@donerhut.com"));

    let response = app.post_form("/business-form/submit", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/business-form?success=submitted");

    let submissions = app.submissions();
    assert_eq!(submissions.len(), 1);
    let sent = &submissions[0];
    assert_eq!(sent["businessName"], "Doner Hut");
    assert_eq!(sent["businessType"], "Food Truck");
    assert_eq!(sent["branchCount"], "2-5");
    assert_eq!(sent["contactEmail"], "hello@donerhut.com");
    assert_eq!(sent["description"], "Best doner in town");

    let body = app
        .get("/business-form?success=submitted")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Form submitted successfully!"));
    assert!(body.contains("Step 1: Business Details"));
    assert!(!body.contains(r#"value="Doner Hut""#));
}

#[tokio::test]
async fn test_submit_failure_keeps_draft() {
    let app = TestApp::spawn_with(BackendBehavior {
        fail_submit: true,
        ..BackendBehavior::default()
    })
    .await;
    complete_wizard(&app).await;

    let response = app.post_form("/business-form/submit", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/business-form?error=submit");
    assert_eq!(app.submissions().len(), 1);

    let body = app
        .get("/business-form?error=submit")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("There was a problem submitting the form. Please try again."));
    assert!(body.contains("Step 5"));
    assert!(body.contains("Food Truck"));
}

#[tokio::test]
async fn test_reset_discards_draft() {
    let app = TestApp::spawn().await;
    next(&app, STEP_ONE).await;

    let response = app.post_form("/business-form/reset", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = app.get("/business-form").await.text().await.unwrap();
    assert!(body.contains("Step 1: Business Details"));
    assert!(!body.contains(r#"value="Kreuzberg""#));
}
