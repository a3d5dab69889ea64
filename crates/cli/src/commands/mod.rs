//! CLI command implementations.
//!
//! Each command works on a [`Context`] holding the catalog and the cart
//! restored from the storefront's data directory.

pub mod cart;
pub mod catalog;
pub mod checkout;

use std::sync::Arc;

use pocket_cart_core::{CartError, CartManager, Catalog, CurrencyCode, KeyValueStore};
use pocket_cart_storefront::config::StorefrontConfig;
use pocket_cart_storefront::storage::FileStore;

/// Everything a command needs.
#[derive(Debug)]
pub struct Context {
    pub catalog: Catalog,
    pub cart: CartManager,
    pub currency: CurrencyCode,
}

impl Context {
    /// Build a context from the storefront environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the catalog cannot be
    /// loaded, or the data directory cannot be opened.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = StorefrontConfig::from_env()?;
        let catalog = pocket_cart_storefront::catalog::load(config.catalog_path.as_deref())?;
        let store = FileStore::open(&config.data_dir)?;
        tracing::debug!(dir = %store.dir().display(), "Using cart storage");

        Ok(Self::new(
            catalog,
            Arc::new(store),
            &config.cart_key,
            config.currency,
        )?)
    }

    /// Build a context over an explicit store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn new(
        catalog: Catalog,
        store: Arc<dyn KeyValueStore>,
        cart_key: &str,
        currency: CurrencyCode,
    ) -> Result<Self, CartError> {
        Ok(Self {
            catalog,
            cart: CartManager::load(store, cart_key)?,
            currency,
        })
    }
}
