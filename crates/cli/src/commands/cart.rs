//! Cart inspection and editing.

use pocket_cart_core::{CartError, Price, ProductId, QuantityUpdate};
use tracing::{info, warn};

use super::Context;

/// Log the cart lines and totals.
pub fn show(ctx: &Context) {
    let cart = &ctx.cart;
    if cart.is_empty() {
        info!("Your cart is empty");
        return;
    }

    for line in cart.lines() {
        info!(
            "  [{}] {} x{} @ {} = {}",
            line.id(),
            line.product.name,
            line.quantity,
            Price::new(line.unit_price(), ctx.currency),
            Price::new(line.line_total(), ctx.currency)
        );
    }
    info!("Items:    {}", cart.total_item_count());
    info!("Subtotal: {}", Price::new(cart.subtotal(), ctx.currency));
    info!("Total:    {}", Price::new(cart.total(), ctx.currency));
}

/// Add one unit of `product_id`. Returns the new item count.
///
/// # Errors
///
/// Returns an error if the product is unknown or the cart cannot be saved.
pub fn add(ctx: &mut Context, product_id: i32) -> Result<u64, CartError> {
    let count = ctx
        .cart
        .add_to_cart_by_id(&ctx.catalog, ProductId::new(product_id))?;
    info!("Added product {product_id}; cart now holds {count} item(s)");
    Ok(count)
}

/// Change the quantity of `product_id` by `delta`.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn update(ctx: &mut Context, product_id: i32, delta: i32) -> Result<QuantityUpdate, CartError> {
    let outcome = ctx
        .cart
        .update_cart_quantity(ProductId::new(product_id), delta)?;
    match outcome {
        QuantityUpdate::Missing => warn!("Product {product_id} is not in the cart"),
        QuantityUpdate::Updated(quantity) => {
            info!("Product {product_id} quantity is now {quantity}");
        }
        QuantityUpdate::Removed => info!("Removed product {product_id}"),
    }
    Ok(outcome)
}

/// Remove the line for `product_id`.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn remove(ctx: &mut Context, product_id: i32) -> Result<bool, CartError> {
    let removed = ctx.cart.remove_from_cart(ProductId::new(product_id))?;
    if removed {
        info!("Removed product {product_id}");
    } else {
        warn!("Product {product_id} is not in the cart");
    }
    Ok(removed)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn clear(ctx: &mut Context) -> Result<(), CartError> {
    ctx.cart.clear_cart()?;
    info!("Cart cleared");
    Ok(())
}
