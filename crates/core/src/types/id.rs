//! Product identifiers.
//!
//! Catalog products and combo offers are keyed by short, human-readable
//! slugs (`"small"`, `"combo-fiesta"`), so the id wraps a `String` rather
//! than a numeric key.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a product or combo offer.
///
/// The cart uses this as the identity of a line: adding the same id twice
/// increments the existing line instead of creating a new one.
///
/// # Example
///
/// ```rust
/// # use pumpkin_express_core::ProductId;
/// let id = ProductId::new("small");
/// assert_eq!(id.as_str(), "small");
/// assert_eq!(id, "small");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_serializes_as_plain_string() {
        let id = ProductId::new("combo-deco");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"combo-deco\"");

        let back: ProductId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId::from("large").to_string(), "large");
    }
}
