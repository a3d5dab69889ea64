//! Catalog listing.

use pocket_cart_core::Price;
use tracing::info;

use super::Context;

/// Log every catalog product in order.
pub fn list(ctx: &Context) {
    info!("Catalog ({} products)", ctx.catalog.len());
    for product in ctx.catalog.products() {
        info!(
            "  [{}] {} - {}",
            product.id,
            product.name,
            Price::new(product.price, ctx.currency)
        );
    }
}
