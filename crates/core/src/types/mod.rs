//! Core types for ReviewHUT.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneError, check_phone, is_valid_phone};
pub use status::*;
