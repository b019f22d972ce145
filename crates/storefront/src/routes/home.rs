//! Home page route handler.
//!
//! The whole store is one page: how-to-order panel, search and sort controls,
//! the product grid and the combo offers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use pumpkin_express_core::{Catalog, CatalogSort, Combo, Product};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::load_cart;
use crate::routes::LayoutView;
use crate::state::AppState;

/// Search and sort query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub sort: String,
}

/// Product card data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Combo offer data for templates.
#[derive(Clone)]
pub struct ComboView {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub price: String,
}

impl From<&Combo> for ComboView {
    fn from(combo: &Combo) -> Self {
        Self {
            id: combo.id.to_string(),
            name: combo.name.clone(),
            summary: combo.summary.clone(),
            price: combo.price.to_string(),
        }
    }
}

/// Sort selector option.
#[derive(Clone)]
pub struct SortOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Products matching the query, ready for the grid.
#[must_use]
pub fn product_views(catalog: &Catalog, query: &CatalogQuery) -> Vec<ProductView> {
    let sort = CatalogSort::parse(&query.sort);
    catalog
        .search(&query.q, sort)
        .into_iter()
        .map(ProductView::from)
        .collect()
}

fn sort_options(query: &CatalogQuery) -> Vec<SortOptionView> {
    let selected = CatalogSort::parse(&query.sort);
    CatalogSort::ALL
        .into_iter()
        .map(|sort| SortOptionView {
            value: sort.as_str(),
            label: sort.label(),
            selected: sort == selected,
        })
        .collect()
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutView,
    pub query: String,
    pub sort_options: Vec<SortOptionView>,
    pub products: Vec<ProductView>,
    pub combos: Vec<ComboView>,
}

/// Display the store.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> HomeTemplate {
    let cart = load_cart(&session).await;

    HomeTemplate {
        layout: LayoutView::new(&state, &cart),
        products: product_views(state.catalog(), &query),
        combos: state.catalog().combos().iter().map(ComboView::from).collect(),
        sort_options: sort_options(&query),
        query: query.q,
    }
}
