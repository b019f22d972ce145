//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each mutation loads the cart from the session, applies one pure cart
//! operation, stores the result and answers with `HX-Trigger: cart-updated`
//! so the header badge refreshes itself. Plain form posts (no JavaScript)
//! are redirected back to a full page instead.

use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use pumpkin_express_core::{Cart, CartLine, Merchandise};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::{load_cart, save_cart};
use crate::routes::{LayoutView, is_htmx};
use crate::state::AppState;

/// HTMX event fired after every cart change.
const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
    pub image_url: Option<String>,
    /// Quantity requested by the "-" button; the cart clamps it at 1.
    pub decrement: i64,
    /// Quantity requested by the "+" button.
    pub increment: i64,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            price: line.price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
            image_url: line.image_url.clone(),
            decrement: i64::from(line.quantity) - 1,
            increment: i64::from(line.quantity) + 1,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub delivery_fee: String,
    pub total: String,
    pub item_count: u32,
    pub is_empty: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal: totals.subtotal.to_string(),
            delivery_fee: totals.delivery_fee.to_string(),
            total: totals.total.to_string(),
            item_count: cart.item_count(),
            is_empty: cart.is_empty(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data. The quantity may be zero or negative; it is
/// clamped to 1.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutView,
    pub cart: CartView,
    /// Blocking message shown above the cart (failed checkout).
    pub alert: Option<String>,
    pub share_url: String,
}

impl CartShowTemplate {
    /// Build the cart page for `cart`.
    #[must_use]
    pub fn new(state: &AppState, cart: &Cart, alert: Option<String>) -> Self {
        Self {
            layout: LayoutView::new(state, cart),
            cart: CartView::from(cart),
            alert,
            share_url: state.config().base_url.to_string(),
        }
    }
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Store `cart` and answer with the cart items fragment, or redirect plain
/// form posts back to the cart page.
async fn respond_with_items(
    session: &Session,
    headers: &HeaderMap,
    cart: &Cart,
) -> Result<Response> {
    save_cart(session, cart).await?;

    if !is_htmx(headers) {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok((
        AppendHeaders([CART_UPDATED]),
        CartItemsTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response())
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> CartShowTemplate {
    let cart = load_cart(&session).await;
    CartShowTemplate::new(&state, &cart, None)
}

/// Add item to cart (HTMX).
///
/// Accepts catalog products and combos. Returns the updated cart count badge
/// with an HTMX trigger so other cart fragments refresh.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a zero quantity, `AppError::NotFound`
/// for an unknown id and `AppError::Session` if the cart cannot be stored.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = NonZeroU32::new(form.quantity.unwrap_or(1))
        .ok_or_else(|| AppError::BadRequest("quantity must be at least 1".to_string()))?;
    let item = state
        .catalog()
        .find(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let cart = load_cart(&session).await.add(&item, quantity);
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", item.id().as_str())]),
    );
    tracing::info!(
        product_id = %item.id(),
        quantity = quantity.get(),
        items = cart.item_count(),
        "Added to cart"
    );

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/").into_response());
    }

    Ok((
        AppendHeaders([CART_UPDATED]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
///
/// # Errors
///
/// Returns `AppError::Session` if the cart cannot be stored.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let cart = load_cart(&session)
        .await
        .update_quantity(&form.product_id, form.quantity);

    respond_with_items(&session, &headers, &cart).await
}

/// Remove item from cart (HTMX).
///
/// # Errors
///
/// Returns `AppError::Session` if the cart cannot be stored.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let cart = load_cart(&session).await.remove(&form.product_id);
    add_breadcrumb(
        "cart",
        "Removed item",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    respond_with_items(&session, &headers, &cart).await
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    CartCountTemplate {
        count: load_cart(&session).await.item_count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use pumpkin_express_core::Catalog;

    use super::*;

    #[test]
    fn test_cart_view_example_order() {
        let catalog = Catalog::pumpkins().unwrap();
        let cart = Cart::new()
            .add(&catalog.find("small").unwrap(), NonZeroU32::new(2).unwrap())
            .add(&catalog.find("large").unwrap(), NonZeroU32::MIN);

        let view = CartView::from(&cart);
        assert_eq!(view.subtotal, "$32.00");
        assert_eq!(view.delivery_fee, "$4.00");
        assert_eq!(view.total, "$36.00");
        assert_eq!(view.item_count, 3);
        assert!(!view.is_empty);

        assert_eq!(view.lines[0].line_total, "$12.00");
        assert_eq!(view.lines[0].decrement, 1);
        assert_eq!(view.lines[0].increment, 3);
    }

    #[test]
    fn test_cart_view_empty() {
        let view = CartView::from(&Cart::new());
        assert!(view.is_empty);
        assert_eq!(view.delivery_fee, "$0.00");
        assert_eq!(view.total, "$0.00");
    }

    #[test]
    fn test_cart_line_view_decrement_at_one_requests_zero() {
        let catalog = Catalog::pumpkins().unwrap();
        let cart = Cart::new().add(&catalog.find("combo-deco").unwrap(), NonZeroU32::MIN);

        let line = CartLineView::from(&cart.lines()[0]);
        assert_eq!(line.decrement, 0);
        assert!(line.image_url.is_none());
    }
}
