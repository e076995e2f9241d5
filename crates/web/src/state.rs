//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::services::{ApiClient, ApiError, DirectoryStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend client, the shared directory and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    api: ApiClient,
    directory: DirectoryStore,
}

impl AppState {
    /// Create a new application state with the sample directory loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be configured.
    pub fn new(config: WebConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                directory: DirectoryStore::seeded(),
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the shared directory.
    #[must_use]
    pub fn directory(&self) -> &DirectoryStore {
        &self.inner.directory
    }
}
