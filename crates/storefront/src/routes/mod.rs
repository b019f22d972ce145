//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (catalog, combos, how to order)
//! GET  /search                 - Product grid fragment (HTMX live search)
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns cart count, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Create payment session and redirect to it
//!
//! # Standalone order form (only when a relay URL is configured)
//! GET  /pedido                 - Plain HTML order form posting to the relay
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod order_form;
pub mod search;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};
use pumpkin_express_core::Cart;

use crate::state::AppState;

/// Data shared by every full page (header and footer).
#[derive(Clone)]
pub struct LayoutView {
    pub cart_count: u32,
    pub delivery_zone: String,
    pub order_form_enabled: bool,
}

impl LayoutView {
    /// Build the layout for a visitor with `cart`.
    #[must_use]
    pub fn new(state: &AppState, cart: &Cart) -> Self {
        Self {
            cart_count: cart.item_count(),
            delivery_zone: state.config().delivery_zone.clone(),
            order_form_enabled: state.config().order_form_relay_url.is_some(),
        }
    }
}

/// Whether the request was issued by HTMX (as opposed to a plain form post).
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
///
/// The order form is mounted only when `order_form_enabled` is set; it shares
/// no state with the cart.
pub fn routes(order_form_enabled: bool) -> Router<AppState> {
    let router = Router::new()
        // Home page
        .route("/", get(home::home))
        // Live search fragment
        .route("/search", get(search::search))
        // Cart routes
        .nest("/cart", cart_routes())
        // Payment session
        .route("/checkout", post(checkout::checkout));

    if order_form_enabled {
        router.route("/pedido", get(order_form::show))
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));

        headers.insert("HX-Request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));

        headers.insert("HX-Request", HeaderValue::from_static("false"));
        assert!(!is_htmx(&headers));
    }
}
