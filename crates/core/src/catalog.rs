//! The read-only product catalog.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{Product, ProductId};

/// Errors that can occur when building a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The catalog document is not valid JSON or has the wrong shape.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two products share an id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    /// A product has a price below zero.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    /// A price has more precision than the JSON number it is stored as.
    #[error("product {0} has a price that cannot be stored exactly")]
    InexactPrice(ProductId),
}

/// An ordered, immutable list of products with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

/// On-disk catalog layout. A bare array of products is accepted as well.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Bare(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl Catalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an id, or a price is negative
    /// or too precise to persist exactly.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        for (index, product) in products.iter().enumerate() {
            if product.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice(product.id));
            }
            if !product.has_exact_json_price() {
                return Err(CatalogError::InexactPrice(product.id));
            }
            if products
                .iter()
                .take(index)
                .any(|earlier| earlier.id == product.id)
            {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Self { products })
    }

    /// Parse a catalog from JSON: either `[...]` or `{"products": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::Bare(products) | CatalogDocument::Wrapped { products } => products,
        };
        Self::new(products)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
