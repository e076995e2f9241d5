//! ReviewHUT Core - Domain types and form rules.
//!
//! This crate holds everything the website knows about its domain that does
//! not need I/O:
//! - [`registration`] - the five-step business registration wizard
//! - [`review_link`] - review-link settings, link generation, and review gating
//! - [`auth`] - login role checks and registration form rules
//! - [`directory`] - business, user, and review records shown on the admin pages
//! - [`types`] - newtypes for emails, IDs, and statuses
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients,
//! no sessions, no templates. The `web` crate owns all of that and calls in
//! here for every decision a form makes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod directory;
pub mod registration;
pub mod review_link;
pub mod types;
pub mod validation;

pub use types::*;
pub use validation::FieldErrors;
