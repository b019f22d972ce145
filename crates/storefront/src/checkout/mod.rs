//! Client for the external payment session endpoint.
//!
//! The storefront does not process payments. At checkout it posts the cart to
//! a configured endpoint that creates a payment session and answers with the
//! URL the visitor should be sent to. Every failure is terminal for that
//! attempt: there is no retry, and clicking checkout twice creates two
//! sessions.

pub mod types;

use std::sync::Arc;

use pumpkin_express_core::Cart;
use thiserror::Error;
use tracing::instrument;
use url::Url;

pub use types::{CheckoutItem, CheckoutRequest, CheckoutSession};

/// Errors that can occur when starting a payment session.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response is JSON but carries no usable redirect URL.
    #[error("Response has no usable redirect url: {0}")]
    MissingRedirectUrl(serde_json::Value),
}

impl CheckoutError {
    /// Message shown to the visitor.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::Parse(_) => {
                "Error al iniciar el pago. Inténtalo de nuevo en unos momentos."
            }
            Self::MissingRedirectUrl(_) => {
                "Respuesta inesperada del servidor de pagos. Inténtalo de nuevo."
            }
        }
    }
}

/// Client for the payment session endpoint.
#[derive(Clone)]
pub struct CheckoutClient {
    inner: Arc<CheckoutClientInner>,
}

struct CheckoutClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl CheckoutClient {
    /// Create a client posting to `endpoint`.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            inner: Arc::new(CheckoutClientInner {
                client: reqwest::Client::new(),
                endpoint,
            }),
        }
    }

    /// The configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Create a payment session for `cart`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Http` on network failure, `CheckoutError::Parse`
    /// when the body is not JSON, and `CheckoutError::MissingRedirectUrl`
    /// when the JSON has no usable `url`. The HTTP status is not consulted:
    /// a body with a valid `url` is accepted whatever the status.
    #[instrument(
        skip(self, cart),
        fields(endpoint = %self.inner.endpoint, lines = cart.lines().len())
    )]
    pub async fn create_session(&self, cart: &Cart) -> Result<CheckoutSession, CheckoutError> {
        let request_body = CheckoutRequest::from(cart);

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Payment endpoint returned non-success status");
        }

        // Get response body as text first for better error diagnostics
        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text).inspect_err(|e| {
            tracing::error!(%status, error = %e, body = %text, "Payment endpoint returned non-JSON body");
        })?;

        let url = types::redirect_url(&body).ok_or(CheckoutError::MissingRedirectUrl(body))?;
        tracing::debug!(%url, "Payment session created");

        Ok(CheckoutSession { url })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_checkout_error_display() {
        let err = CheckoutError::MissingRedirectUrl(json!({ "error": "card declined" }));
        assert_eq!(
            err.to_string(),
            r#"Response has no usable redirect url: {"error":"card declined"}"#
        );
    }

    #[test]
    fn test_user_messages_distinguish_malformed_response() {
        let parse = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let network = CheckoutError::Parse(parse).user_message();
        let malformed = CheckoutError::MissingRedirectUrl(json!({})).user_message();

        assert!(network.starts_with("Error al iniciar el pago"));
        assert!(malformed.starts_with("Respuesta inesperada"));
    }
}
