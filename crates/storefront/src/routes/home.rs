//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use super::products::{ProductView, catalog_views};
use crate::state::AppState;

/// Home page template: hero followed by the full product grid.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
    pub cart_count: u64,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    let cart_count = state.cart().await.total_item_count();

    HomeTemplate {
        products: catalog_views(&state),
        cart_count,
    }
}
