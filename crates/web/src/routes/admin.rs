//! Admin dashboard route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use reviewhut_core::directory::{Business, BusinessEdit, BusinessFilter, NewUserForm, User};
use reviewhut_core::{BusinessId, BusinessStatus, FieldErrors, UserRole};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentAccount, Sidebar};
use crate::services::{DirectoryError, DirectoryStats};
use crate::state::AppState;

/// Query parameters carrying a success code after a redirect.
#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub success: Option<String>,
}

fn success_message(code: &str) -> Option<&'static str> {
    match code {
        "updated" => Some("Business updated successfully."),
        "created" => Some("User created successfully."),
        _ => None,
    }
}

/// `(value, label, selected)` triple for a status or role `<select>`.
pub struct Choice {
    pub value: String,
    pub label: &'static str,
    pub selected: bool,
}

fn status_choices(selected: &str) -> Vec<Choice> {
    BusinessStatus::ALL
        .into_iter()
        .map(|s| Choice {
            value: s.to_string(),
            label: s.label(),
            selected: s.to_string() == selected,
        })
        .collect()
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub sidebar: Sidebar,
    pub stats: DirectoryStats,
    pub pending: Vec<Business>,
}

/// Display directory totals and the businesses awaiting approval.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
) -> impl IntoResponse {
    let pending = state
        .directory()
        .businesses(&BusinessFilter {
            status: BusinessStatus::Pending.to_string(),
            ..BusinessFilter::default()
        })
        .await;

    AdminDashboardTemplate {
        sidebar: Sidebar::admin("/admin/dashboard", account.as_ref()),
        stats: state.directory().stats().await,
        pending,
    }
}

// =============================================================================
// Businesses
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "admin/businesses.html")]
pub struct BusinessesTemplate {
    pub sidebar: Sidebar,
    pub businesses: Vec<Business>,
    pub query: String,
    pub statuses: Vec<Choice>,
    pub all_selected: bool,
    pub notice: Option<&'static str>,
}

/// Query string of the business list: search, status filter, and notice.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BusinessListQuery {
    #[serde(flatten)]
    pub filter: BusinessFilter,
    pub success: Option<String>,
}

/// Display the business list.
#[instrument(skip(state, account))]
pub async fn businesses(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    Query(query): Query<BusinessListQuery>,
) -> impl IntoResponse {
    let businesses = state.directory().businesses(&query.filter).await;
    let status = query.filter.status.trim();

    BusinessesTemplate {
        sidebar: Sidebar::admin("/admin/businesses", account.as_ref()),
        businesses,
        statuses: status_choices(status),
        all_selected: status.is_empty() || status == "all",
        query: query.filter.q.clone(),
        notice: query.success.as_deref().and_then(success_message),
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/edit_business.html")]
pub struct EditBusinessTemplate {
    pub sidebar: Sidebar,
    pub id: BusinessId,
    pub form: BusinessEdit,
    pub statuses: Vec<Choice>,
    pub errors: FieldErrors,
    /// The "discard unsaved changes?" dialog.
    pub confirm_discard: bool,
}

impl EditBusinessTemplate {
    fn new(account: Option<&CurrentAccount>, id: BusinessId, form: BusinessEdit) -> Self {
        Self {
            sidebar: Sidebar::admin("/admin/businesses", account),
            id,
            statuses: status_choices(&form.status),
            form,
            errors: FieldErrors::new(),
            confirm_discard: false,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/business_not_found.html")]
pub struct BusinessNotFoundTemplate {
    pub sidebar: Sidebar,
    pub id: BusinessId,
}

fn business_not_found(account: Option<&CurrentAccount>, id: BusinessId) -> Response {
    (
        StatusCode::NOT_FOUND,
        BusinessNotFoundTemplate {
            sidebar: Sidebar::admin("/admin/businesses", account),
            id,
        },
    )
        .into_response()
}

/// Display the edit form for one business.
#[instrument(skip(state, account))]
pub async fn edit_page(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    Path(id): Path<BusinessId>,
) -> Response {
    match state.directory().business(id).await {
        Some(business) => EditBusinessTemplate::new(
            account.as_ref(),
            id,
            BusinessEdit::from_business(&business),
        )
        .into_response(),
        None => business_not_found(account.as_ref(), id),
    }
}

/// Save the edit form.
#[instrument(skip(state, account, form))]
pub async fn save(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    Path(id): Path<BusinessId>,
    Form(form): Form<BusinessEdit>,
) -> Response {
    match state.directory().update_business(id, &form).await {
        Ok(_) => Redirect::to("/admin/businesses?success=updated").into_response(),
        Err(DirectoryError::BusinessNotFound(id)) => business_not_found(account.as_ref(), id),
        Err(DirectoryError::Invalid(errors)) => {
            let mut page = EditBusinessTemplate::new(account.as_ref(), id, form);
            page.errors = errors;
            (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
        }
    }
}

/// Leave the edit form.
///
/// The form posts its current values; with unsaved changes the page comes
/// back with the discard confirmation open.
#[instrument(skip(state, account, form))]
pub async fn back(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    Path(id): Path<BusinessId>,
    Form(form): Form<BusinessEdit>,
) -> Response {
    let Some(business) = state.directory().business(id).await else {
        return business_not_found(account.as_ref(), id);
    };
    if !form.has_changes(&business) {
        return Redirect::to("/admin/businesses").into_response();
    }

    let mut page = EditBusinessTemplate::new(account.as_ref(), id, form);
    page.confirm_discard = true;
    page.into_response()
}

// =============================================================================
// Users
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub sidebar: Sidebar,
    pub users: Vec<User>,
    /// Active businesses, the only ones that can receive users.
    pub businesses: Vec<Business>,
    pub roles: Vec<Choice>,
    pub form: NewUserForm,
    pub errors: FieldErrors,
    pub notice: Option<&'static str>,
}

impl UsersTemplate {
    async fn load(state: &AppState, account: Option<&CurrentAccount>, form: NewUserForm) -> Self {
        let businesses = state
            .directory()
            .all_businesses()
            .await
            .into_iter()
            .filter(|b| b.status == BusinessStatus::Active)
            .collect();
        let role = if form.role.is_empty() {
            UserRole::default().to_string()
        } else {
            form.role.clone()
        };

        Self {
            sidebar: Sidebar::admin("/admin/users", account),
            users: state.directory().users().await,
            businesses,
            roles: UserRole::ALL
                .into_iter()
                .map(|r| Choice {
                    value: r.to_string(),
                    label: r.label(),
                    selected: r.to_string() == role,
                })
                .collect(),
            form,
            errors: FieldErrors::new(),
            notice: None,
        }
    }
}

/// Display the user list and the add-user form.
#[instrument(skip(state, account))]
pub async fn users(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    let mut page = UsersTemplate::load(&state, account.as_ref(), NewUserForm::default()).await;
    page.notice = query.success.as_deref().and_then(success_message);
    page
}

/// Handle the add-user form.
#[instrument(skip(state, account, form), fields(email = %form.email))]
pub async fn create_user(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    Form(form): Form<NewUserForm>,
) -> Response {
    match state.directory().add_user(form.clone()).await {
        Ok(_) => Redirect::to("/admin/users?success=created").into_response(),
        Err(errors) => {
            let mut page = UsersTemplate::load(&state, account.as_ref(), form).await;
            page.errors = errors;
            (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_choices_mark_selection() {
        let choices = status_choices("pending");
        let selected: Vec<_> = choices.iter().filter(|c| c.selected).map(|c| c.label).collect();
        assert_eq!(selected, ["Pending"]);
        assert!(status_choices("").iter().all(|c| !c.selected));
    }

    #[test]
    fn test_success_codes() {
        assert!(success_message("updated").is_some());
        assert!(success_message("created").is_some());
        assert!(success_message("deleted").is_none());
    }
}
