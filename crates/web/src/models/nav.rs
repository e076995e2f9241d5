//! Dashboard sidebar.

use crate::models::CurrentAccount;

/// One sidebar entry.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub name: &'static str,
    pub href: &'static str,
    pub active: bool,
}

const BUSINESS_LINKS: [(&str, &str); 3] = [
    ("Dashboard", "/business/dashboard"),
    ("Reviews", "/business/reviews"),
    ("Review Link", "/business/review-link"),
];

const ADMIN_LINKS: [(&str, &str); 3] = [
    ("Dashboard", "/admin/dashboard"),
    ("Businesses", "/admin/businesses"),
    ("Users", "/admin/users"),
];

/// Sidebar shown on every dashboard page.
#[derive(Debug, Clone)]
pub struct Sidebar {
    pub is_admin: bool,
    pub links: Vec<NavLink>,
    /// Signed-in email, when there is one.
    pub email: Option<String>,
}

impl Sidebar {
    /// Business dashboard sidebar with `current` highlighted.
    #[must_use]
    pub fn business(current: &str, account: Option<&CurrentAccount>) -> Self {
        Self::build(false, &BUSINESS_LINKS, current, account)
    }

    /// Admin sidebar with `current` highlighted.
    #[must_use]
    pub fn admin(current: &str, account: Option<&CurrentAccount>) -> Self {
        Self::build(true, &ADMIN_LINKS, current, account)
    }

    fn build(
        is_admin: bool,
        links: &[(&'static str, &'static str)],
        current: &str,
        account: Option<&CurrentAccount>,
    ) -> Self {
        Self {
            is_admin,
            links: links
                .iter()
                .map(|&(name, href)| NavLink {
                    name,
                    href,
                    active: href == current,
                })
                .collect(),
            email: account.map(|a| a.email.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_current_link_is_active() {
        let sidebar = Sidebar::admin("/admin/users", None);
        let active: Vec<_> = sidebar.links.iter().filter(|l| l.active).map(|l| l.name).collect();
        assert_eq!(active, ["Users"]);
        assert!(sidebar.email.is_none());
    }

    #[test]
    fn test_shows_signed_in_email() {
        let account = CurrentAccount {
            role: "BUSER".into(),
            email: "owner@donerhut.com".into(),
        };
        let sidebar = Sidebar::business("/business/reviews", Some(&account));
        assert_eq!(sidebar.email.as_deref(), Some("owner@donerhut.com"));
        assert!(!sidebar.is_admin);
    }
}
