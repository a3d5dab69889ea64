//! Cart state and persistence.
//!
//! [`CartManager`] owns the ordered list of line items and writes the whole
//! list back to its [`KeyValueStore`] after every mutation. Callers read
//! snapshots through [`CartManager::lines`] and change the cart only through
//! the mutation methods, passing product ids explicitly.
//!
//! # Persisted layout
//!
//! ```json
//! [
//!   {"id": 1, "name": "...", "price": 100.0, "image": "...", "description": "...", "quantity": 2}
//! ]
//! ```

mod storage;

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::types::{CartLineItem, Product, ProductId};

pub use storage::{KeyValueStore, MemoryStore, StorageError};

/// Storage key used when none is configured.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Errors returned by cart mutations.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// The product id is not in the catalog.
    #[error("unknown product id {0}")]
    UnknownProduct(ProductId),

    /// The product's price would not survive a reload unchanged.
    #[error("product {0} has a price that cannot be stored exactly")]
    InexactPrice(ProductId),

    /// Writing or reading the persisted cart failed.
    #[error("cart storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("cart serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Why a stored cart was discarded on load.
#[derive(Debug, thiserror::Error)]
pub(crate) enum StoredCartRejection {
    #[error("not a cart: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("line {0} has quantity 0")]
    ZeroQuantity(ProductId),
    #[error("line {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("product {0} appears on more than one line")]
    DuplicateLine(ProductId),
}

/// Result of [`CartManager::update_cart_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// No line for that product; nothing changed.
    Missing,
    /// The line now has this quantity.
    Updated(u32),
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
}

/// Owner of the cart's line items.
pub struct CartManager {
    store: Arc<dyn KeyValueStore>,
    key: String,
    lines: Vec<CartLineItem>,
}

impl fmt::Debug for CartManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartManager")
            .field("key", &self.key)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// Restore the cart stored under `key`.
    ///
    /// A missing value, `null`, unparseable JSON or a list that breaks the
    /// cart invariants all produce an empty cart. Only a failing store is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the store cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self, CartError> {
        let key = key.into();

        let lines = match store.get(&key)? {
            None => Vec::new(),
            Some(raw) => parse_stored_cart(&raw).unwrap_or_else(|reason| {
                warn!(key = %key, %reason, "Discarding unreadable stored cart");
                Vec::new()
            }),
        };

        debug!(key = %key, lines = lines.len(), "Cart loaded");

        Ok(Self { store, key, lines })
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Storage key this cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same id gains one unit; otherwise a new line
    /// holding a copy of the product is appended. Returns the new total item
    /// count.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InexactPrice`] if a new line's price cannot be
    /// persisted exactly (the cart is left untouched), or a storage error.
    pub fn add_to_cart(&mut self, product: &Product) -> Result<u64, CartError> {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id() == product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else if product.has_exact_json_price() {
            self.lines.push(CartLineItem::from_product(product));
        } else {
            return Err(CartError::InexactPrice(product.id));
        }

        debug!(product_id = %product.id, "Added to cart");
        self.persist()?;
        Ok(self.total_item_count())
    }

    /// Add one unit of the catalog product with id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if the catalog has no such
    /// product (the cart is left untouched), or a storage error.
    pub fn add_to_cart_by_id(&mut self, catalog: &Catalog, id: ProductId) -> Result<u64, CartError> {
        let product = catalog.find(id).ok_or(CartError::UnknownProduct(id))?;
        self.add_to_cart(product)
    }

    /// Change the quantity of the line for `id` by `delta`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn update_cart_quantity(
        &mut self,
        id: ProductId,
        delta: i32,
    ) -> Result<QuantityUpdate, CartError> {
        let Some(current) = self.line(id).map(|line| line.quantity) else {
            return Ok(QuantityUpdate::Missing);
        };

        let next = i64::from(current) + i64::from(delta);
        if next <= 0 {
            self.remove_from_cart(id)?;
            return Ok(QuantityUpdate::Removed);
        }

        let quantity = u32::try_from(next).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|line| line.id() == id) {
            line.quantity = quantity;
        }

        debug!(product_id = %id, quantity, "Cart quantity updated");
        self.persist()?;
        Ok(QuantityUpdate::Updated(quantity))
    }

    /// Drop the line for `id`. Returns whether a line was removed.
    ///
    /// The cart is persisted either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_from_cart(&mut self, id: ProductId) -> Result<bool, CartError> {
        let before = self.lines.len();
        self.lines.retain(|line| line.id() != id);
        let removed = self.lines.len() != before;

        debug!(product_id = %id, removed, "Removed from cart");
        self.persist()?;
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.lines.clear();
        debug!("Cart cleared");
        self.persist()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Order total. There is no tax, shipping or discount, so this is the
    /// subtotal.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal()
    }

    /// Number of units in the cart (not distinct lines).
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// The JSON array written to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string(&self.lines)?)
    }

    fn persist(&self) -> Result<(), CartError> {
        let json = self.to_json()?;
        self.store.set(&self.key, &json)?;
        Ok(())
    }
}

/// Parse and check a stored cart blob.
pub(crate) fn parse_stored_cart(raw: &str) -> Result<Vec<CartLineItem>, StoredCartRejection> {
    let lines: Vec<CartLineItem> = serde_json::from_str::<Option<_>>(raw)?.unwrap_or_default();

    for (index, line) in lines.iter().enumerate() {
        if line.quantity == 0 {
            return Err(StoredCartRejection::ZeroQuantity(line.id()));
        }
        if line.unit_price() < Decimal::ZERO {
            return Err(StoredCartRejection::NegativePrice(line.id()));
        }
        if lines
            .iter()
            .take(index)
            .any(|earlier| earlier.id() == line.id())
        {
            return Err(StoredCartRejection::DuplicateLine(line.id()));
        }
    }

    Ok(lines)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    /// Reads as empty and refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
    }

    fn product(id: i32, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price,
            image: format!("/static/products/{id}.jpg"),
            description: format!("Description {id}"),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product(1, Decimal::new(10_000, 2)),
            product(2, Decimal::new(5_000, 2)),
            product(3, Decimal::new(1_999, 2)),
        ])
        .unwrap()
    }

    fn empty_cart() -> (MemoryStore, CartManager) {
        let store = MemoryStore::new();
        let cart = CartManager::load(Arc::new(store.clone()), DEFAULT_CART_KEY).unwrap();
        (store, cart)
    }

    fn stored(store: &MemoryStore) -> serde_json::Value {
        serde_json::from_str(&store.get(DEFAULT_CART_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_repeated_adds_keep_one_line() {
        let (_, mut cart) = empty_cart();
        let catalog = catalog();

        for _ in 0..5 {
            cart.add_to_cart_by_id(&catalog, ProductId::new(3)).unwrap();
        }

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(ProductId::new(3)).unwrap().quantity, 5);
    }

    #[test]
    fn test_add_scenario_totals() {
        let (store, mut cart) = empty_cart();
        let catalog = catalog();

        cart.add_to_cart_by_id(&catalog, ProductId::new(1)).unwrap();
        cart.add_to_cart_by_id(&catalog, ProductId::new(2)).unwrap();
        let count = cart.add_to_cart_by_id(&catalog, ProductId::new(1)).unwrap();

        let summary: Vec<(i32, u32)> = cart
            .lines()
            .iter()
            .map(|line| (line.id().as_i32(), line.quantity))
            .collect();
        assert_eq!(summary, [(1, 2), (2, 1)]);
        assert_eq!(cart.subtotal(), Decimal::new(250, 0));
        assert_eq!(cart.total(), cart.subtotal());
        assert_eq!(count, 3);
        assert_eq!(cart.total_item_count(), 3);

        let persisted = stored(&store);
        assert_eq!(persisted[0]["quantity"], 2);
        assert_eq!(persisted[1]["id"], 2);
    }

    #[test]
    fn test_add_unknown_product_leaves_cart_untouched() {
        let (store, mut cart) = empty_cart();

        let err = cart
            .add_to_cart_by_id(&catalog(), ProductId::new(99))
            .unwrap_err();

        assert!(matches!(err, CartError::UnknownProduct(id) if id.as_i32() == 99));
        assert!(cart.is_empty());
        assert!(store.get(DEFAULT_CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_price_is_snapshot_at_insertion() {
        let (_, mut cart) = empty_cart();
        let mut item = product(1, Decimal::new(100, 0));
        cart.add_to_cart(&item).unwrap();

        item.price = Decimal::new(999, 0);
        cart.add_to_cart(&item).unwrap();

        let line = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.unit_price(), Decimal::new(100, 0));
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let (store, mut cart) = empty_cart();
        cart.add_to_cart_by_id(&catalog(), ProductId::new(2)).unwrap();

        let outcome = cart.update_cart_quantity(ProductId::new(2), -1).unwrap();

        assert_eq!(outcome, QuantityUpdate::Removed);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(stored(&store), serde_json::json!([]));
    }

    #[test]
    fn test_negative_delta_past_zero_removes_line() {
        let (_, mut cart) = empty_cart();
        let catalog = catalog();
        for _ in 0..3 {
            cart.add_to_cart_by_id(&catalog, ProductId::new(1)).unwrap();
        }

        let outcome = cart.update_cart_quantity(ProductId::new(1), -3).unwrap();
        assert_eq!(outcome, QuantityUpdate::Removed);
        assert!(cart.line(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_increment_updates_and_persists() {
        let (store, mut cart) = empty_cart();
        cart.add_to_cart_by_id(&catalog(), ProductId::new(1)).unwrap();

        let outcome = cart.update_cart_quantity(ProductId::new(1), 4).unwrap();

        assert_eq!(outcome, QuantityUpdate::Updated(5));
        assert_eq!(stored(&store)[0]["quantity"], 5);
    }

    #[test]
    fn test_update_missing_line_is_noop() {
        let (store, mut cart) = empty_cart();

        let outcome = cart.update_cart_quantity(ProductId::new(1), 1).unwrap();

        assert_eq!(outcome, QuantityUpdate::Missing);
        assert!(store.get(DEFAULT_CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_remove_keeps_order_of_other_lines() {
        let (_, mut cart) = empty_cart();
        let catalog = catalog();
        for id in [1, 2, 3] {
            cart.add_to_cart_by_id(&catalog, ProductId::new(id)).unwrap();
        }

        assert!(cart.remove_from_cart(ProductId::new(2)).unwrap());
        assert!(!cart.remove_from_cart(ProductId::new(2)).unwrap());

        let ids: Vec<i32> = cart.lines().iter().map(|l| l.id().as_i32()).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn test_remove_absent_line_still_persists() {
        let (store, mut cart) = empty_cart();

        assert!(!cart.remove_from_cart(ProductId::new(7)).unwrap());

        assert!(cart.is_empty());
        assert_eq!(store.get(DEFAULT_CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_failed_persist_keeps_in_memory_change() {
        let mut cart = CartManager::load(Arc::new(ReadOnlyStore), DEFAULT_CART_KEY).unwrap();

        let err = cart
            .add_to_cart_by_id(&catalog(), ProductId::new(1))
            .unwrap_err();

        assert!(matches!(err, CartError::Storage(StorageError::Io(_))));
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 1);
        assert_eq!(cart.total_item_count(), 1);
    }

    #[test]
    fn test_clear_persists_empty_array() {
        let (store, mut cart) = empty_cart();
        cart.add_to_cart_by_id(&catalog(), ProductId::new(1)).unwrap();

        cart.clear_cart().unwrap();

        assert!(cart.is_empty());
        assert_eq!(store.get(DEFAULT_CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_reload_restores_identical_lines() {
        let (store, mut cart) = empty_cart();
        let catalog = catalog();
        cart.add_to_cart_by_id(&catalog, ProductId::new(3)).unwrap();
        cart.add_to_cart_by_id(&catalog, ProductId::new(1)).unwrap();
        cart.add_to_cart_by_id(&catalog, ProductId::new(3)).unwrap();

        let reloaded = CartManager::load(Arc::new(store), DEFAULT_CART_KEY).unwrap();

        assert_eq!(reloaded.lines(), cart.lines());
        assert_eq!(reloaded.subtotal(), cart.subtotal());
    }

    #[test]
    fn test_reload_restores_precise_prices() {
        let (store, mut cart) = empty_cart();
        let prices = ["0.1", "19.99", "74.50", "1234567.891"];
        for (id, price) in (1..).zip(prices) {
            cart.add_to_cart(&product(id, Decimal::from_str(price).unwrap()))
                .unwrap();
        }

        let reloaded = CartManager::load(Arc::new(store), DEFAULT_CART_KEY).unwrap();

        assert_eq!(reloaded.lines(), cart.lines());
    }

    #[test]
    fn test_price_that_would_not_reload_is_rejected() {
        let (store, mut cart) = empty_cart();
        let item = product(1, Decimal::from_str("123456789.123456789").unwrap());

        let err = cart.add_to_cart(&item).unwrap_err();

        assert!(matches!(err, CartError::InexactPrice(id) if id.as_i32() == 1));
        assert!(cart.is_empty());
        assert!(store.get(DEFAULT_CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_malformed_json_loads_empty() {
        let store = MemoryStore::with_entry(DEFAULT_CART_KEY, "{not json");
        let cart = CartManager::load(Arc::new(store), DEFAULT_CART_KEY).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_null_loads_empty() {
        let store = MemoryStore::with_entry(DEFAULT_CART_KEY, "null");
        let cart = CartManager::load(Arc::new(store), DEFAULT_CART_KEY).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let store = MemoryStore::with_entry(DEFAULT_CART_KEY, r#"[{"id":"one","qty":2}]"#);
        let cart = CartManager::load(Arc::new(store), DEFAULT_CART_KEY).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_stored_invariant_violations_are_rejected() {
        let line = r#"{"id":1,"name":"A","price":1,"image":"a","description":"d","quantity":1}"#;
        let zero = r#"[{"id":1,"name":"A","price":1,"image":"a","description":"d","quantity":0}]"#;
        let negative =
            r#"[{"id":1,"name":"A","price":-5,"image":"a","description":"d","quantity":2}]"#;

        assert!(matches!(
            parse_stored_cart(&format!("[{line},{line}]")),
            Err(StoredCartRejection::DuplicateLine(_))
        ));
        assert!(matches!(
            parse_stored_cart(zero),
            Err(StoredCartRejection::ZeroQuantity(_))
        ));
        assert!(matches!(
            parse_stored_cart(negative),
            Err(StoredCartRejection::NegativePrice(_))
        ));
        assert_eq!(parse_stored_cart(&format!("[{line}]")).unwrap().len(), 1);
    }

    #[test]
    fn test_negative_stored_price_loads_empty() {
        let raw = r#"[{"id":1,"name":"A","price":-5,"image":"a","description":"d","quantity":2}]"#;
        let store = MemoryStore::with_entry(DEFAULT_CART_KEY, raw);

        let cart = CartManager::load(Arc::new(store), DEFAULT_CART_KEY).unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_custom_key() {
        let store = MemoryStore::new();
        let mut cart = CartManager::load(Arc::new(store.clone()), "shop-cart").unwrap();
        cart.add_to_cart_by_id(&catalog(), ProductId::new(1)).unwrap();

        assert_eq!(cart.key(), "shop-cart");
        assert!(store.get("shop-cart").unwrap().is_some());
        assert!(store.get(DEFAULT_CART_KEY).unwrap().is_none());
    }
}
