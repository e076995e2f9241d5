//! Outbound services: the backend API and the shared directory.

pub mod api;
pub mod directory;

pub use api::{ApiClient, ApiError};
pub use directory::{DirectoryError, DirectoryStats, DirectoryStore};
