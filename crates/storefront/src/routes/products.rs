//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use pocket_cart_core::{CurrencyCode, Price, Product, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: Price::new(product.price, currency).display(),
            image: product.image.clone(),
        }
    }
}

/// Build views for every catalog product, in catalog order.
pub(crate) fn catalog_views(state: &AppState) -> Vec<ProductView> {
    let currency = state.currency();
    state
        .catalog()
        .products()
        .iter()
        .map(|product| ProductView::new(product, currency))
        .collect()
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub cart_count: u64,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub cart_count: u64,
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> ProductsIndexTemplate {
    let cart_count = state.cart().await.total_item_count();

    ProductsIndexTemplate {
        products: catalog_views(&state),
        cart_count,
    }
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ProductShowTemplate> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let product = ProductView::new(product, state.currency());
    let cart_count = state.cart().await.total_item_count();

    Ok(ProductShowTemplate {
        product,
        cart_count,
    })
}
