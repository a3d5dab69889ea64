//! Catalog product record.

use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A purchasable product as listed in the catalog.
///
/// Products are read-only once the catalog is loaded. The cart copies the
/// fields it needs at the time an item is added, so later catalog edits
/// never reach lines that are already in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the store currency. Stored as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URI.
    pub image: String,
    pub description: String,
}

impl Product {
    /// Whether the price reads back unchanged after being written as a JSON
    /// number.
    ///
    /// Prices travel through `f64`, so amounts with more significant digits
    /// than a double holds come back rounded.
    #[must_use]
    pub fn has_exact_json_price(&self) -> bool {
        self.price
            .to_f64()
            .and_then(|value| Decimal::from_str(&value.to_string()).ok())
            == Some(self.price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_is_a_json_number() {
        let product = Product {
            id: ProductId::new(1),
            name: "Masala Chai".to_string(),
            price: Decimal::new(4999, 2),
            image: "/static/chai.jpg".to_string(),
            description: "Loose leaf blend".to_string(),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert!(value["price"].is_number());
        assert_eq!(value["id"], 1);

        let parsed: Product = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.price, Decimal::new(4999, 2));
    }

    #[test]
    fn test_exact_json_price() {
        let mut product = Product {
            id: ProductId::new(3),
            name: "Tea Strainer".to_string(),
            price: Decimal::new(1999, 2),
            image: String::new(),
            description: String::new(),
        };
        assert!(product.has_exact_json_price());

        product.price = Decimal::from_str("123456789.123456789").unwrap();
        assert!(!product.has_exact_json_price());

        product.price = Decimal::from_str("0.1234567890123456789").unwrap();
        assert!(!product.has_exact_json_price());
    }

    #[test]
    fn test_integer_price_is_accepted() {
        let json = r#"{"id":2,"name":"Mug","price":100,"image":"mug.jpg","description":""}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(100, 0));
    }
}
