//! Session-related types.
//!
//! The visitor's [`Cart`] is the only thing stored in the session. Handlers
//! load it, apply one of the cart's pure operations and store the result;
//! nothing else holds a copy.

use pumpkin_express_core::Cart;
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";
}

/// Load the cart from the session.
///
/// A missing or unreadable cart is treated as empty; an unreadable one is
/// logged so a corrupted session does not lock the visitor out of the store.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart from session, starting empty");
            Cart::new()
        }
    }
}

/// Store the cart in the session.
///
/// # Errors
///
/// Returns the session error if the cart cannot be serialized or stored.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}
