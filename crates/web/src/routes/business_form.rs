//! Business registration wizard route handlers.
//!
//! The wizard lives in the visitor's session. Every step is a form post:
//! "Next" applies the step's fields and advances only when the step is
//! complete, "Back" applies them and always moves back. Submitting sends the
//! composed draft to the backend once.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use reviewhut_core::FieldErrors;
use reviewhut_core::registration::{
    BranchCount, BusinessType, DraftFields, RegistrationDraft, RegistrationWizard, SummaryRow,
    WizardError, WizardStep,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentAccount, session_keys};
use crate::state::AppState;

/// Notice after the backend accepted the form.
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Form submitted successfully!";

/// Notice after the backend refused the form or could not be reached.
pub const SUBMIT_FAILURE_MESSAGE: &str =
    "There was a problem submitting the form. Please try again.";

// =============================================================================
// View Types
// =============================================================================

/// Query parameters carrying the outcome of a submit.
#[derive(Debug, Deserialize)]
pub struct OutcomeQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// One entry in a `<select>`.
pub struct SelectOption {
    pub value: &'static str,
    pub selected: bool,
}

/// One dot in the progress indicator.
pub struct StepIndicator {
    pub number: u8,
    pub title: &'static str,
    /// `"done"`, `"current"` or `"upcoming"`.
    pub state: &'static str,
}

pub struct Notice {
    pub success: bool,
    pub message: &'static str,
}

/// Wizard page template.
#[derive(Template, WebTemplate)]
#[template(path = "business_form/wizard.html")]
pub struct WizardTemplate {
    pub account: Option<CurrentAccount>,
    pub step: u8,
    pub step_title: &'static str,
    pub steps: Vec<StepIndicator>,
    pub draft: RegistrationDraft,
    pub business_types: Vec<SelectOption>,
    pub branch_counts: Vec<SelectOption>,
    pub show_custom_type: bool,
    pub errors: FieldErrors,
    pub can_advance: bool,
    pub advance_label: &'static str,
    pub summary: Vec<SummaryRow>,
    pub notice: Option<Notice>,
}

impl WizardTemplate {
    fn new(account: Option<CurrentAccount>, wizard: &RegistrationWizard) -> Self {
        let current = wizard.step();
        let draft = wizard.draft().clone();

        Self {
            account,
            step: current.number(),
            step_title: current.title(),
            steps: WizardStep::ALL
                .into_iter()
                .map(|step| StepIndicator {
                    number: step.number(),
                    title: step.title(),
                    state: match step.cmp(&current) {
                        std::cmp::Ordering::Less => "done",
                        std::cmp::Ordering::Equal => "current",
                        std::cmp::Ordering::Greater => "upcoming",
                    },
                })
                .collect(),
            business_types: BusinessType::ALL
                .into_iter()
                .map(|t| SelectOption {
                    value: t.as_str(),
                    selected: draft.business_type == Some(t),
                })
                .collect(),
            branch_counts: BranchCount::ALL
                .into_iter()
                .map(|c| SelectOption {
                    value: c.as_str(),
                    selected: draft.branch_count == Some(c),
                })
                .collect(),
            show_custom_type: draft.wants_custom_type(),
            errors: FieldErrors::new(),
            can_advance: wizard.can_advance(),
            advance_label: if current == WizardStep::Description {
                "Review"
            } else {
                "Next"
            },
            summary: draft.summary(),
            draft,
            notice: None,
        }
    }

    fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_wizard(session: &Session) -> Result<RegistrationWizard> {
    Ok(session
        .get::<RegistrationWizard>(session_keys::REGISTRATION_WIZARD)
        .await?
        .unwrap_or_default())
}

async fn save_wizard(session: &Session, wizard: &RegistrationWizard) -> Result<()> {
    session
        .insert(session_keys::REGISTRATION_WIZARD, wizard)
        .await?;
    Ok(())
}

// =============================================================================
// Routes
// =============================================================================

/// Display the current step.
#[instrument(skip(session, account))]
pub async fn show(
    session: Session,
    OptionalAuth(account): OptionalAuth,
    Query(query): Query<OutcomeQuery>,
) -> Result<impl IntoResponse> {
    let wizard = load_wizard(&session).await?;
    let mut page = WizardTemplate::new(account, &wizard);

    page.notice = if query.success.as_deref() == Some("submitted") {
        Some(Notice {
            success: true,
            message: SUBMIT_SUCCESS_MESSAGE,
        })
    } else if query.error.as_deref() == Some("submit") {
        Some(Notice {
            success: false,
            message: SUBMIT_FAILURE_MESSAGE,
        })
    } else {
        None
    };

    Ok(page)
}

/// Apply the step's fields and advance when the step is complete.
#[instrument(skip_all)]
pub async fn next(
    session: Session,
    OptionalAuth(account): OptionalAuth,
    Form(fields): Form<DraftFields>,
) -> Result<Response> {
    let mut wizard = load_wizard(&session).await?;
    wizard.apply(fields);

    let outcome = wizard.advance();
    save_wizard(&session, &wizard).await?;

    match outcome {
        Ok(step) => {
            let number = step.number().to_string();
            add_breadcrumb("wizard", "Advanced step", &[("step", number.as_str())]);
            Ok(Redirect::to("/business-form").into_response())
        }
        Err(WizardError::Incomplete { step, errors }) => {
            tracing::debug!(step = step.number(), fields = errors.len(), "Step incomplete");
            let page = WizardTemplate::new(account, &wizard).with_errors(errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(WizardError::AtLastStep) => Ok(Redirect::to("/business-form").into_response()),
    }
}

/// Apply the step's fields and go back one step. Never blocked.
#[instrument(skip_all)]
pub async fn back(session: Session, Form(fields): Form<DraftFields>) -> Result<Redirect> {
    let mut wizard = load_wizard(&session).await?;
    wizard.apply(fields);
    wizard.back();
    save_wizard(&session, &wizard).await?;
    Ok(Redirect::to("/business-form"))
}

/// Send the composed draft to the backend.
///
/// On success the draft is discarded. On failure it is kept so the visitor
/// can try again from the review step.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(account): OptionalAuth,
) -> Result<Response> {
    let mut wizard = load_wizard(&session).await?;

    let submission = match wizard.submission() {
        Ok(submission) => submission,
        Err(WizardError::Incomplete { errors, .. }) => {
            save_wizard(&session, &wizard).await?;
            let page = WizardTemplate::new(account, &wizard).with_errors(errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
        Err(WizardError::AtLastStep) => return Ok(Redirect::to("/business-form").into_response()),
    };

    match state.api().submit_business(&submission).await {
        Ok(()) => {
            session
                .remove::<RegistrationWizard>(session_keys::REGISTRATION_WIZARD)
                .await?;
            add_breadcrumb("wizard", "Business form submitted", &[]);
            Ok(Redirect::to("/business-form?success=submitted").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Business form submission failed");
            Ok(Redirect::to("/business-form?error=submit").into_response())
        }
    }
}

/// Throw the draft away and start again on step 1.
#[instrument(skip_all)]
pub async fn reset(session: Session) -> Result<Redirect> {
    session
        .remove::<RegistrationWizard>(session_keys::REGISTRATION_WIZARD)
        .await?;
    Ok(Redirect::to("/business-form"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_indicator_states() {
        let mut wizard = RegistrationWizard::new();
        wizard.apply(DraftFields {
            business_name: Some("Doner Hut".into()),
            location: Some("Berlin".into()),
            business_type: Some("Restaurant".into()),
            branch_count: Some("2-5".into()),
            ..DraftFields::default()
        });
        assert!(wizard.advance().is_ok());

        let page = WizardTemplate::new(None, &wizard);
        let states: Vec<_> = page.steps.iter().map(|s| s.state).collect();
        assert_eq!(states, ["done", "current", "upcoming", "upcoming", "upcoming"]);
        assert_eq!(page.step, 2);
        assert!(page.business_types.iter().any(|o| o.selected && o.value == "Restaurant"));
    }

    #[test]
    fn test_review_label_on_description_step() {
        let page = WizardTemplate::new(None, &RegistrationWizard::new());
        assert_eq!(page.advance_label, "Next");
        assert!(!page.can_advance);
        assert!(!page.show_custom_type);
    }
}
