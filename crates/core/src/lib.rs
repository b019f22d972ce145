//! Pumpkin Express Core - Catalog and cart domain types.
//!
//! This crate provides the domain model shared by the storefront binary and
//! its tests:
//! - [`types`] - Newtype wrappers for product ids and prices
//! - [`catalog`] - The fixed product set, combo offers, search and sorting
//! - [`cart`] - The cart value, its pure operations and derived totals
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no session handling. A [`Cart`] is an owned value; every operation consumes
//! it and returns the updated cart, so whoever holds the value decides where
//! it lives.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::{Catalog, CatalogError, CatalogItem, CatalogSort, Combo, Merchandise, Product};
pub use types::*;
