//! Pocket Cart Core - Shared types and cart state.
//!
//! This crate provides the pieces every Pocket Cart component builds on:
//! - `storefront` - Server-rendered shop with the cart views
//! - `cli` - Command-line tools for inspecting and editing the cart
//!
//! # Architecture
//!
//! The core crate contains types, the cart manager and the storage trait it
//! persists through - no file access, no HTTP. Concrete stores live with the
//! binaries that need them.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products and cart line items
//! - [`catalog`] - The read-only product list the cart draws from
//! - [`cart`] - The cart manager and its key-value storage port
//! - [`checkout`] - Checkout form handling that clears the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use catalog::{Catalog, CatalogError};
pub use cart::{CartError, CartManager, KeyValueStore, MemoryStore, QuantityUpdate, StorageError};
pub use checkout::{CheckoutForm, CheckoutOutcome, submit_checkout};
pub use types::*;
