//! Application state shared across handlers.

use std::sync::Arc;

use dropship_core::CurrencyCode;

use crate::api::{ApiError, CommerceClient};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the commerce API client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    commerce: CommerceClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the commerce API client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let commerce = CommerceClient::new(&config.commerce)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, commerce }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce API client.
    #[must_use]
    pub fn commerce(&self) -> &CommerceClient {
        &self.inner.commerce
    }

    /// Currency every cart is kept in.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.config.currency
    }
}
