//! Checkout submission.
//!
//! Checkout is local only: a form with the customer's name and email. A
//! complete form empties the cart; an incomplete one is ignored without
//! feedback. Nothing is sent anywhere and no order record is kept.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::cart::{CartError, CartManager};

/// Checkout form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl CheckoutForm {
    /// Both fields are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty()
    }
}

/// What happened to a checkout submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart was cleared. Totals are as they were just before clearing.
    Accepted { order_total: Decimal, item_count: u64 },
    /// A required field was empty; the cart is unchanged.
    Ignored,
}

/// Submit the checkout form against `cart`.
///
/// # Errors
///
/// Returns an error if clearing the cart cannot be persisted.
pub fn submit_checkout(
    cart: &mut CartManager,
    form: &CheckoutForm,
) -> Result<CheckoutOutcome, CartError> {
    if !form.is_complete() {
        return Ok(CheckoutOutcome::Ignored);
    }

    let order_total = cart.total();
    let item_count = cart.total_item_count();
    cart.clear_cart()?;

    info!(%order_total, item_count, "Checkout completed");
    Ok(CheckoutOutcome::Accepted {
        order_total,
        item_count,
    })
}
