//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::CommerceClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone; holds the configuration and the API client, whose
/// connection pool and catalog cache are shared by every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: CommerceClient,
}

impl AppState {
    /// Create the application state and its API client.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = CommerceClient::new(&config.api);
        Self {
            inner: Arc::new(AppStateInner { config, api }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The remote commerce API client.
    #[must_use]
    pub fn api(&self) -> &CommerceClient {
        &self.inner.api
    }
}
