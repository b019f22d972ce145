//! Live search route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::routes::home::{CatalogQuery, ProductView, product_views};
use crate::state::AppState;

/// Product grid fragment template (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub query: String,
    pub products: Vec<ProductView>,
}

/// Product grid filtered by the live query (HTMX).
///
/// An empty query returns the full catalog.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ProductGridTemplate {
    let products = product_views(state.catalog(), &query);
    tracing::debug!(hits = products.len(), "Catalog search");

    ProductGridTemplate {
        query: query.q,
        products,
    }
}
