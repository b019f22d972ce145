//! Checkout route handler.
//!
//! Hands the cart to the external payment session endpoint and sends the
//! visitor to the URL it returns. On any failure the cart page is shown again
//! with an alert; the visitor retries manually.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::models::load_cart;
use crate::routes::cart::CartShowTemplate;
use crate::state::AppState;

/// Create a payment session and redirect to it.
///
/// An empty cart is not sent; the visitor is sent back to the cart page.
/// The cart is left untouched whatever the outcome.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    match state.checkout().create_session(&cart).await {
        Ok(checkout_session) => {
            tracing::info!(
                url = %checkout_session.url,
                total = %cart.totals().total,
                "Redirecting to payment session"
            );
            Redirect::to(checkout_session.url.as_str()).into_response()
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(
                error = %e,
                sentry_event_id = %event_id,
                "Failed to start checkout"
            );

            let page = CartShowTemplate::new(&state, &cart, Some(e.user_message().to_string()));
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}
