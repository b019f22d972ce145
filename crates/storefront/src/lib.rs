//! Pumpkin Express Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` only loads
//! configuration, sets up tracing and Sentry, and serves [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the storefront router with all routes and middleware.
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer =
        middleware::create_session_layer(state.config(), middleware::CartSessionStore::default());
    let order_form_enabled = state.config().order_form_relay_url.is_some();
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(order_form_enabled))
        .nest_service("/static", static_dir)
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. The storefront has no
/// dependencies worth probing: the payment endpoint is only contacted at
/// checkout.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use pumpkin_express_core::{Catalog, Price, Product};

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig::from_lookup(|_| None).unwrap()
    }

    fn test_state(relay: Option<&str>) -> AppState {
        let mut config = test_config();
        config.order_form_relay_url = relay.map(|url| url.parse().unwrap());
        AppState::new(config).unwrap()
    }

    async fn status_of(state: AppState, uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app(state).oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(status_of(test_state(None), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_order_form_mounted_only_with_relay() {
        assert_eq!(
            status_of(test_state(None), "/pedido").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(test_state(Some("https://relay.example/orders")), "/pedido").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_custom_catalog_is_served() {
        let gourd = Product {
            id: "gourd".into(),
            name: "Calabacín Ornamental".to_string(),
            description: "Solo para decorar.".to_string(),
            price: Price::from_cents(350),
            image_url: "https://img.example/gourd.png".to_string(),
        };
        let catalog = Catalog::new(vec![gourd], Vec::new()).unwrap();
        let state = AppState::with_catalog(test_config(), catalog);

        let request = Request::builder()
            .uri("/search?q=")
            .body(Body::empty())
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Calabacín Ornamental"));
        assert!(html.contains("$3.50"));
        assert!(!html.contains("Calabaza Grande"));
    }
}
