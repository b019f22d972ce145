//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: `http://localhost:3000`)
//! - `STOREFRONT_STATIC_DIR` - Directory served under `/static` (default: crates/storefront/static)
//! - `STOREFRONT_DELIVERY_ZONE` - Delivery zone shown in the header (default: Tu ciudad)
//! - `CHECKOUT_ENDPOINT` - Payment session endpoint, absolute or relative to the
//!   base URL (default: /api/create-checkout-session)
//! - `ORDER_FORM_RELAY_URL` - Form relay address for the `/pedido` order form.
//!   The page is only served when this is set.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

const DEFAULT_CHECKOUT_ENDPOINT: &str = "/api/create-checkout-session";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Directory with CSS and other static assets
    pub static_dir: String,
    /// Delivery zone label
    pub delivery_zone: String,
    /// Endpoint that creates payment sessions
    pub checkout_endpoint: Url,
    /// Third-party form relay for the standalone order form
    pub order_form_relay_url: Option<Url>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env
            .or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("STOREFRONT_HOST", &e))?;
        let port = env
            .or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| invalid("STOREFRONT_PORT", &e))?;
        let base_url = Url::parse(&env.or_default("STOREFRONT_BASE_URL", "http://localhost:3000"))
            .map_err(|e| invalid("STOREFRONT_BASE_URL", &e))?;

        let checkout_endpoint = base_url
            .join(&env.or_default("CHECKOUT_ENDPOINT", DEFAULT_CHECKOUT_ENDPOINT))
            .map_err(|e| invalid("CHECKOUT_ENDPOINT", &e))?;
        let order_form_relay_url = env
            .optional("ORDER_FORM_RELAY_URL")
            .map(|raw| Url::parse(&raw))
            .transpose()
            .map_err(|e| invalid("ORDER_FORM_RELAY_URL", &e))?;

        Ok(Self {
            host,
            port,
            base_url,
            static_dir: env.or_default("STOREFRONT_STATIC_DIR", "crates/storefront/static"),
            delivery_zone: env.or_default("STOREFRONT_DELIVERY_ZONE", "Tu ciudad"),
            checkout_endpoint,
            order_form_relay_url,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the defaulting rules used above.
struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a sample rate in `0.0..=1.0`.
    fn sample_rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        let rate = raw.parse::<f32>().map_err(|e| invalid(key, &e))?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ));
        }
        Ok(rate)
    }
}

fn invalid(key: &str, err: &impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(
            config.checkout_endpoint.as_str(),
            "http://localhost:3000/api/create-checkout-session"
        );
        assert!(config.order_form_relay_url.is_none());
        assert_eq!(config.delivery_zone, "Tu ciudad");
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_relative_checkout_endpoint_resolves_against_base_url() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "https://calabazas.example"),
            ("CHECKOUT_ENDPOINT", "/pagos/sesion"),
        ])
        .unwrap();

        assert_eq!(
            config.checkout_endpoint.as_str(),
            "https://calabazas.example/pagos/sesion"
        );
        assert!(config.is_secure());
    }

    #[test]
    fn test_absolute_checkout_endpoint_is_kept() {
        let config = load(&[("CHECKOUT_ENDPOINT", "https://pay.example/v1/sessions")]).unwrap();
        assert_eq!(
            config.checkout_endpoint.as_str(),
            "https://pay.example/v1/sessions"
        );
    }

    #[test]
    fn test_order_form_relay_url() {
        let config = load(&[("ORDER_FORM_RELAY_URL", "https://formsubmit.co/pedidos@example.com")])
            .unwrap();
        assert_eq!(
            config.order_form_relay_url.unwrap().host_str(),
            Some("formsubmit.co")
        );

        let blank = load(&[("ORDER_FORM_RELAY_URL", "  ")]).unwrap();
        assert!(blank.order_form_relay_url.is_none());

        assert!(load(&[("ORDER_FORM_RELAY_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "70000")]).unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_host() {
        assert!(load(&[("STOREFRONT_HOST", "localhost")]).is_err());
    }

    #[test]
    fn test_sample_rate_bounds() {
        let config = load(&[("SENTRY_TRACES_SAMPLE_RATE", "0.25")]).unwrap();
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);

        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        assert!(load(&[("SENTRY_SAMPLE_RATE", "often")]).is_err());
    }
}
