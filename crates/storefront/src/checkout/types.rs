//! Wire types for the payment session endpoint.
//!
//! Request:
//!
//! ```json
//! {
//!   "items": [{ "id": "small", "name": "Calabaza Pequeña", "price": 6.0, "qty": 2, "img": "…" }],
//!   "deliveryFee": 4.0
//! }
//! ```
//!
//! Expected response: `{ "url": "https://…" }`.

use pumpkin_express_core::{Cart, CartLine};
use rust_decimal::Decimal;
use serde::Serialize;
use url::Url;

/// Body of the create-session request.
#[derive(Debug, Serialize)]
pub struct CheckoutRequest<'a> {
    pub items: Vec<CheckoutItem<'a>>,
    #[serde(rename = "deliveryFee", with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
}

/// One cart line as sent to the payment endpoint.
#[derive(Debug, Serialize)]
pub struct CheckoutItem<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub qty: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<&'a str>,
}

/// A payment session the visitor should be redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub url: Url,
}

impl<'a> From<&'a CartLine> for CheckoutItem<'a> {
    fn from(line: &'a CartLine) -> Self {
        Self {
            id: line.product_id.as_str(),
            name: &line.name,
            price: line.price.amount(),
            qty: line.quantity,
            img: line.image_url.as_deref(),
        }
    }
}

impl<'a> From<&'a Cart> for CheckoutRequest<'a> {
    fn from(cart: &'a Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CheckoutItem::from).collect(),
            delivery_fee: cart.totals().delivery_fee.amount(),
        }
    }
}

/// Extract the redirect target from a response body.
///
/// Only a non-empty, absolute `http`/`https` URL in the `url` field counts.
pub(super) fn redirect_url(body: &serde_json::Value) -> Option<Url> {
    body.get("url")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| Url::parse(s).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::num::NonZeroU32;

    use pumpkin_express_core::Catalog;
    use serde_json::json;

    use super::*;

    fn example_cart() -> Cart {
        let catalog = Catalog::pumpkins().unwrap();
        Cart::new()
            .add(&catalog.find("small").unwrap(), NonZeroU32::new(2).unwrap())
            .add(&catalog.find("combo-fiesta").unwrap(), NonZeroU32::MIN)
    }

    #[test]
    fn test_request_body_shape() {
        let cart = example_cart();
        let body = serde_json::to_value(CheckoutRequest::from(&cart)).unwrap();

        assert_eq!(body["deliveryFee"].as_f64(), Some(4.0));

        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "small");
        assert_eq!(items[0]["name"], "Calabaza Pequeña");
        assert_eq!(items[0]["price"].as_f64(), Some(6.0));
        assert_eq!(items[0]["qty"], 2);
        assert!(items[0]["img"].is_string());

        assert_eq!(items[1]["id"], "combo-fiesta");
        assert_eq!(items[1]["price"].as_f64(), Some(22.0));
        assert!(items[1].get("img").is_none());
    }

    #[test]
    fn test_redirect_url_accepts_absolute_http_urls() {
        let url = redirect_url(&json!({ "url": "https://checkout.example/c/pay_123" })).unwrap();
        assert_eq!(url.as_str(), "https://checkout.example/c/pay_123");
    }

    #[test]
    fn test_redirect_url_rejects_unusable_values() {
        assert!(redirect_url(&json!({})).is_none());
        assert!(redirect_url(&json!({ "url": "" })).is_none());
        assert!(redirect_url(&json!({ "url": "   " })).is_none());
        assert!(redirect_url(&json!({ "url": null })).is_none());
        assert!(redirect_url(&json!({ "url": 42 })).is_none());
        assert!(redirect_url(&json!({ "url": "/relative/path" })).is_none());
        assert!(redirect_url(&json!({ "url": "javascript:alert(1)" })).is_none());
        assert!(redirect_url(&json!(["https://checkout.example"])).is_none());
    }
}
