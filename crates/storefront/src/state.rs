//! Application state shared across handlers.

use std::sync::Arc;

use pumpkin_express_core::{Catalog, CatalogError};

use crate::checkout::CheckoutClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog is built once at
/// startup and never changes; carts live in visitor sessions, not here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    checkout: CheckoutClient,
}

impl AppState {
    /// Create a new application state with the Pumpkin Express catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog lists an id twice.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        Ok(Self::with_catalog(config, Catalog::pumpkins()?))
    }

    /// Create a new application state with a specific catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let checkout = CheckoutClient::new(config.checkout_endpoint.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkout,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the payment session client.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutClient {
        &self.inner.checkout
    }
}
