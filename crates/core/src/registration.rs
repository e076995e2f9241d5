//! Business registration wizard.
//!
//! A linear five-step form: business details, contact info, social links,
//! description, review. Moving forward is gated by the current step's field
//! checks; moving back never is. The draft lives only as long as the visitor's
//! session and is dropped once the backend accepts it.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::{Email, check_phone};
use crate::validation::FieldErrors;

// =============================================================================
// Select Options
// =============================================================================

/// Business category chosen on step 1.
///
/// `Other` unlocks a free-text field whose value replaces the category when
/// the draft is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    Retail,
    Restaurant,
    Service,
    Tech,
    Other,
}

impl BusinessType {
    /// All types in the order the select lists them.
    pub const ALL: [Self; 5] = [
        Self::Retail,
        Self::Restaurant,
        Self::Service,
        Self::Tech,
        Self::Other,
    ];

    /// The select option value, which is also the label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retail => "Retail",
            Self::Restaurant => "Restaurant",
            Self::Service => "Service",
            Self::Tech => "Tech",
            Self::Other => "Other",
        }
    }

    /// Parse a select value. The empty placeholder option yields `None`.
    #[must_use]
    pub fn from_select(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value.trim())
    }
}

/// Bucketed number of branches chosen on step 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchCount {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2-5")]
    TwoToFive,
    #[serde(rename = "6-10")]
    SixToTen,
    #[serde(rename = "11+")]
    ElevenPlus,
}

impl BranchCount {
    pub const ALL: [Self; 4] = [Self::One, Self::TwoToFive, Self::SixToTen, Self::ElevenPlus];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::TwoToFive => "2-5",
            Self::SixToTen => "6-10",
            Self::ElevenPlus => "11+",
        }
    }

    /// Parse a select value. The empty placeholder option yields `None`.
    #[must_use]
    pub fn from_select(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value.trim())
    }
}

// =============================================================================
// Steps
// =============================================================================

/// The five wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum WizardStep {
    #[default]
    BusinessDetails,
    ContactInfo,
    SocialLinks,
    Description,
    Review,
}

impl WizardStep {
    pub const ALL: [Self; 5] = [
        Self::BusinessDetails,
        Self::ContactInfo,
        Self::SocialLinks,
        Self::Description,
        Self::Review,
    ];

    /// 1-based step number shown in the heading.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::BusinessDetails => 1,
            Self::ContactInfo => 2,
            Self::SocialLinks => 3,
            Self::Description => 4,
            Self::Review => 5,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::BusinessDetails => "Business Details",
            Self::ContactInfo => "Contact Info",
            Self::SocialLinks => "Social Media",
            Self::Description => "Business Description",
            Self::Review => "Review & Submit",
        }
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::BusinessDetails => Some(Self::ContactInfo),
            Self::ContactInfo => Some(Self::SocialLinks),
            Self::SocialLinks => Some(Self::Description),
            Self::Description => Some(Self::Review),
            Self::Review => None,
        }
    }

    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::BusinessDetails => None,
            Self::ContactInfo => Some(Self::BusinessDetails),
            Self::SocialLinks => Some(Self::ContactInfo),
            Self::Description => Some(Self::SocialLinks),
            Self::Review => Some(Self::Description),
        }
    }
}

// =============================================================================
// Draft
// =============================================================================

/// In-progress registration data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub business_name: String,
    pub location: String,
    pub branch: String,
    pub business_type: Option<BusinessType>,
    pub custom_business_type: String,
    pub branch_count: Option<BranchCount>,
    pub contact_email: String,
    pub contact_phone: String,
    pub whatsapp: String,
    pub secondary_email: String,
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
    pub website: String,
    pub description: String,
}

/// Raw field values posted by one wizard step.
///
/// Every field is optional: a step's form only carries its own inputs, and
/// absent fields leave the draft untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DraftFields {
    pub business_name: Option<String>,
    pub location: Option<String>,
    pub branch: Option<String>,
    pub business_type: Option<String>,
    pub custom_business_type: Option<String>,
    pub branch_count: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub whatsapp: Option<String>,
    pub secondary_email: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

/// One labelled line on the review step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

fn set_if_present(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl RegistrationDraft {
    /// Apply the fields that belong to `step`; anything else is ignored.
    pub fn apply(&mut self, step: WizardStep, fields: DraftFields) {
        match step {
            WizardStep::BusinessDetails => {
                set_if_present(&mut self.business_name, fields.business_name);
                set_if_present(&mut self.location, fields.location);
                set_if_present(&mut self.branch, fields.branch);
                set_if_present(&mut self.custom_business_type, fields.custom_business_type);
                if let Some(value) = fields.business_type {
                    self.business_type = BusinessType::from_select(&value);
                }
                if let Some(value) = fields.branch_count {
                    self.branch_count = BranchCount::from_select(&value);
                }
            }
            WizardStep::ContactInfo => {
                set_if_present(&mut self.contact_email, fields.contact_email);
                set_if_present(&mut self.contact_phone, fields.contact_phone);
                set_if_present(&mut self.whatsapp, fields.whatsapp);
                set_if_present(&mut self.secondary_email, fields.secondary_email);
            }
            WizardStep::SocialLinks => {
                set_if_present(&mut self.facebook, fields.facebook);
                set_if_present(&mut self.instagram, fields.instagram);
                set_if_present(&mut self.linkedin, fields.linkedin);
                set_if_present(&mut self.website, fields.website);
            }
            WizardStep::Description => {
                set_if_present(&mut self.description, fields.description);
            }
            WizardStep::Review => {}
        }
    }

    /// Returns `true` when the custom business type input should be shown.
    #[must_use]
    pub fn wants_custom_type(&self) -> bool {
        self.business_type == Some(BusinessType::Other)
    }

    /// Category sent to the backend: the custom text for `Other`, the label otherwise.
    #[must_use]
    pub fn resolved_business_type(&self) -> String {
        match self.business_type {
            Some(BusinessType::Other) => self.custom_business_type.trim().to_string(),
            Some(other) => other.as_str().to_string(),
            None => String::new(),
        }
    }

    /// Checks that block leaving `step`.
    #[must_use]
    pub fn step_errors(&self, step: WizardStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            WizardStep::BusinessDetails => {
                errors.require("business_name", &self.business_name, "Business name is required");
                errors.require("location", &self.location, "Location is required");
                if self.business_type.is_none() {
                    errors.add("business_type", "Business type is required");
                }
                if self.wants_custom_type() {
                    errors.require(
                        "custom_business_type",
                        &self.custom_business_type,
                        "Please specify the business type",
                    );
                }
                if self.branch_count.is_none() {
                    errors.add("branch_count", "Branch count is required");
                }
            }
            WizardStep::ContactInfo => {
                if errors.require("contact_email", &self.contact_email, "Contact email is required") {
                    check_email(&mut errors, "contact_email", &self.contact_email);
                }
                if errors.require("contact_phone", &self.contact_phone, "Phone number is required") {
                    check_phone_field(&mut errors, "contact_phone", &self.contact_phone);
                }
                check_phone_field(&mut errors, "whatsapp", &self.whatsapp);
                check_email(&mut errors, "secondary_email", &self.secondary_email);
            }
            WizardStep::SocialLinks => {
                check_link(&mut errors, "facebook", &self.facebook);
                check_link(&mut errors, "instagram", &self.instagram);
                check_link(&mut errors, "linkedin", &self.linkedin);
                check_link(&mut errors, "website", &self.website);
            }
            WizardStep::Description | WizardStep::Review => {}
        }
        errors
    }

    /// Labelled values for the review step. Blank optional fields show "-".
    #[must_use]
    pub fn summary(&self) -> Vec<SummaryRow> {
        let row = |label, value: &str| SummaryRow {
            label,
            value: if value.trim().is_empty() {
                "-".to_string()
            } else {
                value.trim().to_string()
            },
        };
        vec![
            row("Business Name", &self.business_name),
            row("Location", &self.location),
            row("Branch", &self.branch),
            row("Business Type", &self.resolved_business_type()),
            row("Branch Count", self.branch_count.map_or("", BranchCount::as_str)),
            row("Contact Email", &self.contact_email),
            row("Phone", &self.contact_phone),
            row("WhatsApp", &self.whatsapp),
            row("Secondary Email", &self.secondary_email),
            row("Facebook", &self.facebook),
            row("Instagram", &self.instagram),
            row("LinkedIn", &self.linkedin),
            row("Website", &self.website),
            row("Description", &self.description),
        ]
    }
}

fn check_email(errors: &mut FieldErrors, field: &'static str, value: &str) {
    let value = value.trim();
    if !value.is_empty() && Email::parse(value).is_err() {
        errors.add(field, "Enter a valid email address");
    }
}

fn check_phone_field(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if !value.trim().is_empty() && check_phone(value).is_err() {
        errors.add(field, "Enter a valid phone number");
    }
}

fn check_link(errors: &mut FieldErrors, field: &'static str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    let ok = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false);
    if !ok {
        errors.add(field, "Enter a full URL starting with https://");
    }
}

// =============================================================================
// Submission
// =============================================================================

/// The record sent to `POST /api/businessform/submit`.
///
/// Mirrors the draft field names in camelCase, with `businessType` already
/// resolved from the "Other" placeholder to its free-text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSubmission {
    pub business_name: String,
    pub location: String,
    pub branch: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub whatsapp: String,
    pub secondary_email: String,
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
    pub website: String,
    pub description: String,
    pub business_type: String,
    pub branch_count: String,
    pub custom_business_type: String,
}

// =============================================================================
// Wizard
// =============================================================================

/// Errors from moving through the wizard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// The current step has blocking field errors.
    #[error("{} field(s) need attention on step {}", .errors.len(), .step.number())]
    Incomplete {
        step: WizardStep,
        errors: FieldErrors,
    },
    /// There is no step after the review step.
    #[error("already on the last step")]
    AtLastStep,
}

/// Wizard position plus the draft being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationWizard {
    step: WizardStep,
    draft: RegistrationDraft,
}

impl RegistrationWizard {
    /// Start an empty wizard on step 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub const fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Update the draft with the current step's fields.
    pub fn apply(&mut self, fields: DraftFields) {
        self.draft.apply(self.step, fields);
    }

    /// Whether "Next" (or "Review" on step 4) is enabled.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.step != WizardStep::Review && self.draft.step_errors(self.step).is_empty()
    }

    /// Move forward one step if the current step is complete.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Incomplete`] with the blocking messages, or
    /// [`WizardError::AtLastStep`] on the review step. The step is unchanged.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::AtLastStep)?;
        let errors = self.draft.step_errors(self.step);
        if !errors.is_empty() {
            return Err(WizardError::Incomplete {
                step: self.step,
                errors,
            });
        }
        self.step = next;
        Ok(next)
    }

    /// Move back one step. Never blocked; a no-op on step 1.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Compose the record to submit.
    ///
    /// Every earlier step is re-checked; the first incomplete one is reported
    /// and the wizard jumps back to it.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Incomplete`] for the first step with errors.
    pub fn submission(&mut self) -> Result<BusinessSubmission, WizardError> {
        for step in WizardStep::ALL {
            let errors = self.draft.step_errors(step);
            if !errors.is_empty() {
                self.step = step;
                return Err(WizardError::Incomplete { step, errors });
            }
        }

        let d = &self.draft;
        Ok(BusinessSubmission {
            business_name: d.business_name.trim().to_string(),
            location: d.location.trim().to_string(),
            branch: d.branch.trim().to_string(),
            contact_email: d.contact_email.trim().to_string(),
            contact_phone: d.contact_phone.trim().to_string(),
            whatsapp: d.whatsapp.trim().to_string(),
            secondary_email: d.secondary_email.trim().to_string(),
            facebook: d.facebook.trim().to_string(),
            instagram: d.instagram.trim().to_string(),
            linkedin: d.linkedin.trim().to_string(),
            website: d.website.trim().to_string(),
            description: d.description.trim().to_string(),
            business_type: d.resolved_business_type(),
            branch_count: d.branch_count.map(BranchCount::as_str).unwrap_or_default().to_string(),
            custom_business_type: d.custom_business_type.trim().to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn details() -> DraftFields {
        DraftFields {
            business_name: Some("Doner Hut".into()),
            location: Some("Austin, TX".into()),
            branch: Some("Downtown".into()),
            business_type: Some("Restaurant".into()),
            branch_count: Some("2-5".into()),
            ..DraftFields::default()
        }
    }

    fn contact() -> DraftFields {
        DraftFields {
            contact_email: Some("owner@donerhut.com".into()),
            contact_phone: Some("+1 234 567 890".into()),
            ..DraftFields::default()
        }
    }

    fn wizard_at_review() -> RegistrationWizard {
        let mut wizard = RegistrationWizard::new();
        wizard.apply(details());
        wizard.advance().unwrap();
        wizard.apply(contact());
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.apply(DraftFields {
            description: Some("Best doner in town".into()),
            ..DraftFields::default()
        });
        wizard.advance().unwrap();
        wizard
    }

    #[test]
    fn test_empty_wizard_cannot_advance() {
        let mut wizard = RegistrationWizard::new();
        assert!(!wizard.can_advance());
        let err = wizard.advance().unwrap_err();
        let WizardError::Incomplete { step, errors } = err else {
            panic!("expected incomplete step");
        };
        assert_eq!(step, WizardStep::BusinessDetails);
        assert!(errors.has("business_name"));
        assert!(errors.has("location"));
        assert!(errors.has("business_type"));
        assert!(errors.has("branch_count"));
        assert!(!errors.has("branch"), "branch name is optional");
        assert_eq!(wizard.step(), WizardStep::BusinessDetails);
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let mut wizard = RegistrationWizard::new();
        wizard.apply(DraftFields {
            business_name: Some("   ".into()),
            ..details()
        });
        assert!(!wizard.can_advance());
    }

    #[test]
    fn test_step_one_complete_advances() {
        let mut wizard = RegistrationWizard::new();
        wizard.apply(details());
        assert!(wizard.can_advance());
        assert_eq!(wizard.advance().unwrap(), WizardStep::ContactInfo);
    }

    #[test]
    fn test_other_requires_custom_type() {
        let mut wizard = RegistrationWizard::new();
        wizard.apply(DraftFields {
            business_type: Some("Other".into()),
            ..details()
        });
        assert!(wizard.draft().wants_custom_type());
        assert!(!wizard.can_advance());

        wizard.apply(DraftFields {
            custom_business_type: Some("Bakery".into()),
            ..DraftFields::default()
        });
        assert!(wizard.can_advance());

        wizard.apply(DraftFields {
            custom_business_type: Some(String::new()),
            ..DraftFields::default()
        });
        assert!(!wizard.can_advance(), "clearing the custom type re-blocks");
    }

    #[test]
    fn test_step_two_requires_email_and_phone() {
        let mut wizard = RegistrationWizard::new();
        wizard.apply(details());
        wizard.advance().unwrap();
        assert!(!wizard.can_advance());

        wizard.apply(DraftFields {
            contact_email: Some("owner@donerhut.com".into()),
            ..DraftFields::default()
        });
        assert!(!wizard.can_advance());

        wizard.apply(contact());
        assert!(wizard.can_advance());
    }

    #[test]
    fn test_step_two_checks_formats() {
        let mut wizard = RegistrationWizard::new();
        wizard.apply(details());
        wizard.advance().unwrap();
        wizard.apply(DraftFields {
            contact_email: Some("not-an-email".into()),
            contact_phone: Some("call me".into()),
            whatsapp: Some("abc".into()),
            ..DraftFields::default()
        });
        let errors = wizard.draft().step_errors(WizardStep::ContactInfo);
        assert_eq!(errors.get("contact_email"), Some("Enter a valid email address"));
        assert_eq!(errors.get("contact_phone"), Some("Enter a valid phone number"));
        assert_eq!(errors.get("whatsapp"), Some("Enter a valid phone number"));
    }

    #[test]
    fn test_social_links_must_be_urls_when_given() {
        let mut draft = RegistrationDraft::default();
        assert!(draft.step_errors(WizardStep::SocialLinks).is_empty());

        draft.apply(
            WizardStep::SocialLinks,
            DraftFields {
                facebook: Some("facebook.com/donerhut".into()),
                website: Some("https://donerhut.com".into()),
                ..DraftFields::default()
            },
        );
        let errors = draft.step_errors(WizardStep::SocialLinks);
        assert!(errors.has("facebook"));
        assert!(!errors.has("website"));
    }

    #[test]
    fn test_apply_ignores_fields_of_other_steps() {
        let mut wizard = RegistrationWizard::new();
        wizard.apply(DraftFields {
            contact_email: Some("sneaky@example.com".into()),
            ..details()
        });
        assert_eq!(wizard.draft().contact_email, "");
        assert_eq!(wizard.draft().business_name, "Doner Hut");
    }

    #[test]
    fn test_back_is_never_blocked() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.back(), WizardStep::BusinessDetails);

        wizard.apply(details());
        wizard.advance().unwrap();
        // Step 2 is incomplete, but going back still works.
        assert_eq!(wizard.back(), WizardStep::BusinessDetails);
        assert_eq!(wizard.draft().business_name, "Doner Hut");
    }

    #[test]
    fn test_review_step_cannot_advance() {
        let mut wizard = wizard_at_review();
        assert_eq!(wizard.step(), WizardStep::Review);
        assert!(!wizard.can_advance());
        assert_eq!(wizard.advance().unwrap_err(), WizardError::AtLastStep);
    }

    #[test]
    fn test_submission_resolves_other_type() {
        let mut wizard = RegistrationWizard::new();
        wizard.apply(DraftFields {
            business_type: Some("Other".into()),
            custom_business_type: Some("  Bakery ".into()),
            ..details()
        });
        wizard.advance().unwrap();
        wizard.apply(contact());

        let submission = wizard.submission().unwrap();
        assert_eq!(submission.business_type, "Bakery");
        assert_eq!(submission.branch_count, "2-5");

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["businessType"], "Bakery");
        assert_eq!(json["businessName"], "Doner Hut");
        assert_eq!(json["contactEmail"], "owner@donerhut.com");
        assert!(json.get("customBusinessType").is_some());
    }

    #[test]
    fn test_submission_keeps_enum_label() {
        let mut wizard = wizard_at_review();
        let submission = wizard.submission().unwrap();
        assert_eq!(submission.business_type, "Restaurant");
        assert_eq!(submission.description, "Best doner in town");
    }

    #[test]
    fn test_submission_jumps_to_first_incomplete_step() {
        let mut wizard = wizard_at_review();
        wizard.draft.contact_phone.clear();
        let err = wizard.submission().unwrap_err();
        assert!(matches!(
            err,
            WizardError::Incomplete {
                step: WizardStep::ContactInfo,
                ..
            }
        ));
        assert_eq!(wizard.step(), WizardStep::ContactInfo);
    }

    #[test]
    fn test_summary_marks_blank_fields() {
        let wizard = wizard_at_review();
        let summary = wizard.draft().summary();
        let whatsapp = summary.iter().find(|r| r.label == "WhatsApp").unwrap();
        assert_eq!(whatsapp.value, "-");
        let kind = summary.iter().find(|r| r.label == "Business Type").unwrap();
        assert_eq!(kind.value, "Restaurant");
    }

    #[test]
    fn test_wizard_survives_session_serialization() {
        let wizard = wizard_at_review();
        let json = serde_json::to_string(&wizard).unwrap();
        let restored: RegistrationWizard = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, wizard);
    }
}
