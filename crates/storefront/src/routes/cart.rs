//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation names its product explicitly in the form body, is
//! persisted by the cart manager, and only then is the fragment rendered.
//! Plain form posts (no `HX-Request` header) are redirected to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use pocket_cart_core::{
    CartError, CartLineItem, CartManager, CurrencyCode, Price, ProductId, QuantityUpdate,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// HTMX event fired after any cart change so the badge refreshes itself.
const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Whether the request was issued by HTMX rather than a plain form post.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Snapshot the cart for rendering.
    #[must_use]
    pub fn new(cart: &CartManager, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView::new(line, currency))
                .collect(),
            subtotal: Price::new(cart.subtotal(), currency).display(),
            total: Price::new(cart.total(), currency).display(),
            item_count: cart.total_item_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn new(line: &CartLineItem, currency: CurrencyCode) -> Self {
        Self {
            id: line.id().as_i32(),
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            quantity: line.quantity,
            price: Price::new(line.unit_price(), currency).display(),
            line_price: Price::new(line.line_total(), currency).display(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart form data. `delta` is usually +1 or -1.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub delta: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u64,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartShowTemplate {
    let cart = state.cart().await;
    let view = CartView::new(&cart, state.currency());

    CartShowTemplate {
        cart_count: view.item_count,
        cart: view,
    }
}

/// Add item to cart (HTMX).
///
/// Returns the updated count badge and an HTMX trigger for other listeners.
#[instrument(skip(state, headers))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product_id = form.product_id;
    let count = state
        .with_cart(move |cart, state| cart.add_to_cart_by_id(state.catalog(), product_id))
        .await??;

    let product_id = product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, headers))]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let UpdateCartForm { product_id, delta } = form;
    let (outcome, view) = state
        .with_cart(move |cart, state| {
            let outcome = cart.update_cart_quantity(product_id, delta)?;
            Ok::<_, CartError>((outcome, CartView::new(cart, state.currency())))
        })
        .await??;

    if outcome == QuantityUpdate::Missing {
        tracing::debug!(product_id = %product_id, "Quantity change for product not in cart");
    }

    Ok(items_response(&headers, view))
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let product_id = form.product_id;
    let (removed, view) = state
        .with_cart(move |cart, state| {
            let removed = cart.remove_from_cart(product_id)?;
            Ok::<_, CartError>((removed, CartView::new(cart, state.currency())))
        })
        .await??;

    if removed {
        let product_id = product_id.to_string();
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", product_id.as_str())]),
        );
    }

    Ok(items_response(&headers, view))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    CartCountTemplate {
        count: state.cart().await.total_item_count(),
    }
}

fn items_response(headers: &HeaderMap, cart: CartView) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/cart").into_response();
    }

    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate { cart },
    )
        .into_response()
}
