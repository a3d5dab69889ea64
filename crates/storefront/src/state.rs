//! Application state shared across handlers.

use std::sync::Arc;

use pocket_cart_core::{CartError, CartManager, Catalog, CurrencyCode, KeyValueStore};
use tokio::sync::{Mutex, MutexGuard};

use crate::config::StorefrontConfig;
use crate::error::AppError;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The single cart lives behind
/// a mutex, so each request's cart operation runs to completion before the
/// next one starts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Mutex<CartManager>,
}

impl AppState {
    /// Create a new application state, restoring the cart from `store`.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Products available for purchase
    /// * `store` - Persistent storage holding the cart
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CartError> {
        let cart = CartManager::load(store, config.cart_key.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(cart),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Display currency.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.config.currency
    }

    /// Lock the cart for a read-only look.
    pub async fn cart(&self) -> MutexGuard<'_, CartManager> {
        self.inner.cart.lock().await
    }

    /// Run a cart mutation on the blocking thread pool.
    ///
    /// Mutations write through to the store, which may do file I/O, so they
    /// hold the cart lock off the async workers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the blocking task panics or is
    /// cancelled.
    pub async fn with_cart<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut CartManager, &Self) -> T + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut cart = state.inner.cart.blocking_lock();
            op(&mut cart, &state)
        })
        .await
        .map_err(|e| AppError::Internal(format!("cart task failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocket_cart_core::{MemoryStore, ProductId};

    use super::*;
    use crate::catalog;

    fn state() -> (MemoryStore, AppState) {
        let store = MemoryStore::new();
        let state = AppState::new(
            StorefrontConfig::default(),
            catalog::builtin().unwrap(),
            Arc::new(store.clone()),
        )
        .unwrap();
        (store, state)
    }

    #[tokio::test]
    async fn test_with_cart_mutates_and_persists() {
        let (store, state) = state();

        let count = state
            .with_cart(|cart, state| cart.add_to_cart_by_id(state.catalog(), ProductId::new(1)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(state.cart().await.total_item_count(), 1);
        assert!(store.get("cart").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_with_cart_reports_panics() {
        let (_, state) = state();

        let result = state.with_cart(|_, _| -> u64 { panic!("boom") }).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(state.cart().await.is_empty());
    }
}
