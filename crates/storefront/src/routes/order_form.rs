//! Standalone order form.
//!
//! A plain HTML page for visitors who prefer to write their order by hand.
//! The browser posts `nombre`, `direccion`, `telefono` and `pedido` straight
//! to a third-party form relay; the storefront never sees the submission and
//! the page shares nothing with the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Order form page template.
#[derive(Template, WebTemplate)]
#[template(path = "order_form.html")]
pub struct OrderFormTemplate {
    pub relay_url: String,
}

/// Display the order form.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no relay URL is configured.
pub async fn show(State(state): State<AppState>) -> Result<OrderFormTemplate> {
    let relay_url = state
        .config()
        .order_form_relay_url
        .as_ref()
        .ok_or_else(|| AppError::NotFound("order form".to_string()))?;

    Ok(OrderFormTemplate {
        relay_url: relay_url.to_string(),
    })
}
