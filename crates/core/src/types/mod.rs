//! Core types for Pocket Cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod line_item;
pub mod price;
pub mod product;

pub use id::*;
pub use line_item::CartLineItem;
pub use price::{CurrencyCode, CurrencyCodeError, Price};
pub use product::Product;
