//! View and session models for the site.

pub mod nav;
pub mod session;

pub use nav::{NavLink, Sidebar};
pub use session::{CurrentAccount, keys as session_keys};
