//! The shopping cart.
//!
//! A [`Cart`] is a plain value: an ordered list of lines, one per item id.
//! Every operation takes the cart by value and returns the updated cart, so
//! the caller owns where the cart is stored and when observers are told about
//! the change. Totals are derived on every read and never stored.
//!
//! # Invariants
//!
//! - No two lines share a product id.
//! - Every line has a quantity of at least 1. Lowering a quantity clamps at 1;
//!   only [`Cart::remove`] deletes a line.
//! - Lines keep the order in which their item was first added.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::catalog::Merchandise;
use crate::types::{Price, ProductId};

/// Flat delivery fee charged on any non-empty cart, in cents.
pub const DELIVERY_FEE_CENTS: u32 = 400;

/// One item and its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    fn new(item: &(impl Merchandise + ?Sized), quantity: NonZeroU32) -> Self {
        Self {
            product_id: item.id().clone(),
            name: item.name().to_owned(),
            price: item.price(),
            quantity: quantity.get(),
            image_url: item.image_url().map(str::to_owned),
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Derived cart amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

/// The visitor's order in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == id)
    }

    /// Add `quantity` of `item`.
    ///
    /// Increments the existing line for the item's id, or appends a new line.
    /// There is no upper bound; the quantity saturates at `u32::MAX`.
    #[must_use]
    pub fn add(mut self, item: &(impl Merchandise + ?Sized), quantity: NonZeroU32) -> Self {
        match self.lines.iter_mut().find(|l| &l.product_id == item.id()) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity.get()),
            None => self.lines.push(CartLine::new(item, quantity)),
        }
        self
    }

    /// Set the quantity of the line for `id` to `max(1, quantity)`.
    ///
    /// Zero and negative quantities clamp to 1. Unknown ids leave the cart
    /// unchanged.
    #[must_use]
    pub fn update_quantity(mut self, id: &str, quantity: i64) -> Self {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == id) {
            line.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        }
        self
    }

    /// Remove the line for `id`. Unknown ids leave the cart unchanged.
    #[must_use]
    pub fn remove(mut self, id: &str) -> Self {
        self.lines.retain(|l| l.product_id != id);
        self
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, l| count.saturating_add(l.quantity))
    }

    /// Subtotal, delivery fee and total.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal: Price = self.lines.iter().map(CartLine::line_total).sum();
        let delivery_fee = if self.is_empty() {
            Price::ZERO
        } else {
            Price::from_cents(DELIVERY_FEE_CENTS)
        };

        CartTotals {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }
}
