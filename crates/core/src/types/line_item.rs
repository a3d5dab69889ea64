//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One entry in a cart: a snapshot of a product plus an aggregated quantity.
///
/// Serialized flat, so the persisted object carries `id`, `name`, `price`,
/// `image`, `description` and `quantity` side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLineItem {
    /// Start a new line with quantity 1 from a copy of `product`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product: product.clone(),
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price captured when the line was created.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.product.price
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}
