//! The fixed product catalog and combo offers.
//!
//! Products are the searchable pumpkins shown as cards. Combos are bundled
//! add-on offers shown in their own panel; they are not searchable but can
//! be added to the cart like any product. Both implement [`Merchandise`],
//! which is all the cart needs to know about an item.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Price, ProductId};

/// Something that can be put in the cart.
pub trait Merchandise {
    /// Unique id; the cart's line identity.
    fn id(&self) -> &ProductId;

    /// Display name copied onto the cart line.
    fn name(&self) -> &str;

    /// Unit price.
    fn price(&self) -> Price;

    /// Image shown next to the cart line, if any.
    fn image_url(&self) -> Option<&str> {
        None
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
}

impl Product {
    /// Whether `needle` (already lowercased) occurs in the name or description.
    fn matches(&self, needle: &str) -> bool {
        format!("{} {}", self.name, self.description)
            .to_lowercase()
            .contains(needle)
    }
}

impl Merchandise for Product {
    fn id(&self) -> &ProductId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> Price {
        self.price
    }

    fn image_url(&self) -> Option<&str> {
        Some(&self.image_url)
    }
}

/// A fixed-price bundle offered alongside the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    pub id: ProductId,
    pub name: String,
    /// One-line description of what the bundle contains.
    pub summary: String,
    pub price: Price,
}

impl Merchandise for Combo {
    fn id(&self) -> &ProductId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> Price {
        self.price
    }
}

/// A product or combo resolved by [`Catalog::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogItem<'a> {
    Product(&'a Product),
    Combo(&'a Combo),
}

impl Merchandise for CatalogItem<'_> {
    fn id(&self) -> &ProductId {
        match self {
            Self::Product(p) => p.id(),
            Self::Combo(c) => c.id(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Product(p) => p.name(),
            Self::Combo(c) => c.name(),
        }
    }

    fn price(&self) -> Price {
        match self {
            Self::Product(p) => p.price(),
            Self::Combo(c) => c.price(),
        }
    }

    fn image_url(&self) -> Option<&str> {
        match self {
            Self::Product(p) => p.image_url(),
            Self::Combo(c) => c.image_url(),
        }
    }
}

/// Sort order for the product grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogSort {
    /// Catalog order.
    #[default]
    Popular,
    PriceAsc,
    PriceDesc,
}

impl CatalogSort {
    /// All sort options, in the order they appear in the sort selector.
    pub const ALL: [Self; 3] = [Self::Popular, Self::PriceAsc, Self::PriceDesc];

    /// Parse a sort key from a query string. Unknown keys fall back to
    /// [`CatalogSort::Popular`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            _ => Self::Popular,
        }
    }

    /// Query string key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    /// Label shown in the sort selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popular => "Orden: Más populares",
            Self::PriceAsc => "Más baratas",
            Self::PriceDesc => "Más caras",
        }
    }
}

/// Errors building a [`Catalog`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two entries (products or combos) share an id.
    #[error("duplicate catalog id: {0}")]
    DuplicateId(ProductId),
}

/// The immutable set of products and combos offered by the store.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    combos: Vec<Combo>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids across products and combos.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] for the first repeated id.
    pub fn new(products: Vec<Product>, combos: Vec<Combo>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let ids = products
            .iter()
            .map(|p| &p.id)
            .chain(combos.iter().map(|c| &c.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(CatalogError::DuplicateId(id.clone()));
            }
        }

        Ok(Self { products, combos })
    }

    /// The Pumpkin Express catalog: three pumpkin sizes and two combos.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if an id is listed twice.
    pub fn pumpkins() -> Result<Self, CatalogError> {
        let product = |id: &str, name: &str, description: &str, cents: u32, image: &str| Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            price: Price::from_cents(cents),
            image_url: format!("https://via.placeholder.com/600x420?text={image}"),
        };
        let combo = |id: &str, name: &str, summary: &str, cents: u32| Combo {
            id: ProductId::new(id),
            name: name.to_owned(),
            summary: summary.to_owned(),
            price: Price::from_cents(cents),
        };

        Self::new(
            vec![
                product(
                    "small",
                    "Calabaza Pequeña",
                    "Perfecta para mesas y decoraciones pequeñas.",
                    600,
                    "Calabaza+Peque%C3%B1a",
                ),
                product(
                    "medium",
                    "Calabaza Mediana",
                    "Ideal para tallar y colocar en el porche.",
                    1200,
                    "Calabaza+Mediana",
                ),
                product(
                    "large",
                    "Calabaza Grande",
                    "Gran tamaño: la que más destaca en tu decoración.",
                    2000,
                    "Calabaza+Grande",
                ),
            ],
            vec![
                combo(
                    "combo-deco",
                    "Pack Decoración",
                    "Calabaza mediana + página de diseños",
                    1800,
                ),
                combo(
                    "combo-fiesta",
                    "Pack Fiesta",
                    "Calabaza + bolsa de dulces",
                    2200,
                ),
            ],
        )
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All combo offers.
    #[must_use]
    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    /// Products whose name or description contains `query`, ignoring case,
    /// in the requested order.
    ///
    /// An empty query matches every product.
    #[must_use]
    pub fn search(&self, query: &str, sort: CatalogSort) -> Vec<&Product> {
        let needle = query.to_lowercase();
        let mut hits: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.matches(&needle))
            .collect();

        match sort {
            CatalogSort::Popular => {}
            CatalogSort::PriceAsc => hits.sort_by_key(|p| p.price),
            CatalogSort::PriceDesc => hits.sort_by(|a, b| b.price.cmp(&a.price)),
        }

        hits
    }

    /// Look up a product or combo by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<CatalogItem<'_>> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .map(CatalogItem::Product)
            .or_else(|| {
                self.combos
                    .iter()
                    .find(|c| c.id == id)
                    .map(CatalogItem::Combo)
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_pumpkin_catalog_passes_id_check() {
        let catalog = Catalog::pumpkins().unwrap();
        assert_eq!(catalog.products().len(), 3);
        assert_eq!(catalog.combos().len(), 2);
    }

    #[test]
    fn test_new_rejects_combo_shadowing_product() {
        let catalog = Catalog::pumpkins().unwrap();
        let mut combos = catalog.combos().to_vec();
        combos[0].id = ProductId::new("small");

        let err = Catalog::new(catalog.products().to_vec(), combos).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId(ProductId::new("small")));
    }

    #[test]
    fn test_empty_query_returns_full_catalog() {
        let catalog = Catalog::pumpkins().unwrap();
        let hits = catalog.search("", CatalogSort::Popular);
        assert_eq!(ids(&hits), ["small", "medium", "large"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let catalog = Catalog::pumpkins().unwrap();

        assert_eq!(ids(&catalog.search("GRANDE", CatalogSort::Popular)), ["large"]);
        // "porche" only appears in the medium pumpkin's description
        assert_eq!(ids(&catalog.search("Porche", CatalogSort::Popular)), ["medium"]);
        assert_eq!(ids(&catalog.search("PEQUEÑA", CatalogSort::Popular)), ["small"]);
    }

    #[test]
    fn test_search_spans_name_description_boundary() {
        let catalog = Catalog::pumpkins().unwrap();
        // Name and description are joined with a single space.
        let hits = catalog.search("grande gran", CatalogSort::Popular);
        assert_eq!(ids(&hits), ["large"]);
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let catalog = Catalog::pumpkins().unwrap();
        assert!(catalog.search("sandía", CatalogSort::Popular).is_empty());
    }

    #[test]
    fn test_combos_are_not_searchable() {
        let catalog = Catalog::pumpkins().unwrap();
        assert!(catalog.search("pack fiesta", CatalogSort::Popular).is_empty());
    }

    #[test]
    fn test_sort_by_price() {
        let catalog = Catalog::pumpkins().unwrap();

        let asc = catalog.search("", CatalogSort::PriceAsc);
        assert_eq!(ids(&asc), ["small", "medium", "large"]);

        let desc = catalog.search("calabaza", CatalogSort::PriceDesc);
        assert_eq!(ids(&desc), ["large", "medium", "small"]);
    }

    #[test]
    fn test_sort_parse_falls_back_to_popular() {
        assert_eq!(CatalogSort::parse("price-asc"), CatalogSort::PriceAsc);
        assert_eq!(CatalogSort::parse("price-desc"), CatalogSort::PriceDesc);
        assert_eq!(CatalogSort::parse(""), CatalogSort::Popular);
        assert_eq!(CatalogSort::parse("cheapest"), CatalogSort::Popular);

        for sort in CatalogSort::ALL {
            assert_eq!(CatalogSort::parse(sort.as_str()), sort);
        }
    }

    #[test]
    fn test_find_resolves_products_and_combos() {
        let catalog = Catalog::pumpkins().unwrap();

        let small = catalog.find("small").unwrap();
        assert!(matches!(small, CatalogItem::Product(_)));
        assert_eq!(small.price(), Price::from_cents(600));
        assert!(small.image_url().is_some());

        let fiesta = catalog.find("combo-fiesta").unwrap();
        assert!(matches!(fiesta, CatalogItem::Combo(_)));
        assert_eq!(fiesta.name(), "Pack Fiesta");
        assert_eq!(fiesta.price(), Price::from_cents(2200));
        assert!(fiesta.image_url().is_none());

        assert!(catalog.find("pumpkin-spice").is_none());
    }
}
