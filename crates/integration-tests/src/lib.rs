//! Integration tests for Pumpkin Express.
//!
//! Each test spawns the storefront in-process on an ephemeral port, together
//! with a stub payment endpoint, and drives it over HTTP with a cookie-aware
//! client so the cart survives between requests like it does in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pumpkin-express-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use pumpkin_express_storefront::{app, config::StorefrontConfig, state::AppState};
use reqwest::{Client, RequestBuilder, redirect::Policy};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;

/// Error type for test helpers.
pub type TestError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for test helpers.
pub type TestResult<T> = Result<T, TestError>;

/// A running stub of the payment session endpoint.
///
/// Answers every POST with a fixed JSON body and records the request bodies.
pub struct PaymentStub {
    pub endpoint: Url,
    received: Arc<Mutex<Vec<Value>>>,
}

impl PaymentStub {
    /// Start a stub that replies with `response`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn(response: Value) -> TestResult<Self> {
        let received = Arc::new(Mutex::new(Vec::new()));
        let stub_state = (Arc::clone(&received), Arc::new(response));

        let router = Router::new()
            .route("/api/create-checkout-session", post(create_session))
            .with_state(stub_state);

        let addr = serve(router).await?;
        let endpoint = Url::parse(&format!("http://{addr}/api/create-checkout-session"))?;

        Ok(Self { endpoint, received })
    }

    /// Request bodies received so far.
    pub async fn received(&self) -> Vec<Value> {
        self.received.lock().await.clone()
    }
}

type StubState = (Arc<Mutex<Vec<Value>>>, Arc<Value>);

async fn create_session(
    State((received, response)): State<StubState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    received.lock().await.push(body);
    Json(response.as_ref().clone())
}

/// A storefront served on an ephemeral port.
pub struct TestStore {
    pub base_url: Url,
    pub client: Client,
}

impl TestStore {
    /// Start a storefront that sends checkouts to `checkout_endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the client built.
    pub async fn spawn(checkout_endpoint: Url) -> TestResult<Self> {
        Self::spawn_with_relay(checkout_endpoint, None).await
    }

    /// Start a storefront with the standalone order form relaying to `relay`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the client built.
    pub async fn spawn_with_relay(checkout_endpoint: Url, relay: Option<Url>) -> TestResult<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}/"))?;

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: base_url.clone(),
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static").to_string(),
            delivery_zone: "Zona de pruebas".to_string(),
            checkout_endpoint,
            order_form_relay_url: relay,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let router = app(AppState::new(config)?);
        tokio::spawn(async move { axum::serve(listener, router).await });

        // Redirects are asserted on, never followed
        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Absolute URL for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid relative URL.
    pub fn url(&self, path: &str) -> TestResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// GET `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid relative URL.
    pub fn get(&self, path: &str) -> TestResult<RequestBuilder> {
        Ok(self.client.get(self.url(path)?))
    }

    /// Form POST to `path` as a plain browser would send it.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid relative URL.
    pub fn post_form(&self, path: &str, form: &[(&str, &str)]) -> TestResult<RequestBuilder> {
        Ok(self.client.post(self.url(path)?).form(form))
    }

    /// Form POST to `path` as HTMX sends it.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid relative URL.
    pub fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> TestResult<RequestBuilder> {
        Ok(self.post_form(path, form)?.header("HX-Request", "true"))
    }

    /// Add `product_id` to the cart through the HTMX endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is not answered with 200.
    pub async fn add_to_cart(&self, product_id: &str) -> TestResult<()> {
        self.htmx_post("/cart/add", &[("product_id", product_id)])?
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Address nothing listens on, for unreachable-endpoint tests.
///
/// # Errors
///
/// Returns an error if no ephemeral port can be reserved.
pub async fn unreachable_endpoint() -> TestResult<Url> {
    let addr = TcpListener::bind("127.0.0.1:0").await?.local_addr()?;
    Ok(Url::parse(&format!("http://{addr}/api/create-checkout-session"))?)
}

async fn serve(router: Router) -> TestResult<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, router).await });
    Ok(addr)
}
