//! Checkout from the command line.

use pocket_cart_core::{CartError, CheckoutForm, CheckoutOutcome, Price, submit_checkout};
use tracing::{info, warn};

use super::Context;

/// Submit the checkout form with the given name and email.
///
/// # Errors
///
/// Returns an error if the cleared cart cannot be saved.
pub fn submit(ctx: &mut Context, name: String, email: String) -> Result<CheckoutOutcome, CartError> {
    let form = CheckoutForm { name, email };
    let outcome = submit_checkout(&mut ctx.cart, &form)?;

    match outcome {
        CheckoutOutcome::Accepted {
            order_total,
            item_count,
        } => info!(
            "Order placed: {item_count} item(s), {}",
            Price::new(order_total, ctx.currency)
        ),
        CheckoutOutcome::Ignored => warn!("Checkout needs both --name and --email; cart unchanged"),
    }
    Ok(outcome)
}
