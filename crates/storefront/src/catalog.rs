//! Product catalog loading.
//!
//! The storefront ships with a built-in catalog compiled into the binary.
//! `STOREFRONT_CATALOG_PATH` swaps it for a JSON file read once at startup.

use std::path::Path;

use pocket_cart_core::{Catalog, CatalogError};
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../catalog/products.json");

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

/// The catalog bundled with the binary.
///
/// # Errors
///
/// Returns an error if the bundled JSON is invalid.
pub fn builtin() -> Result<Catalog, CatalogError> {
    Catalog::from_json(BUILTIN_CATALOG)
}

/// Load the catalog from `path`, or the built-in one when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a valid
/// catalog.
pub fn load(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = path else {
        let catalog = builtin()?;
        tracing::info!(products = catalog.len(), "Loaded built-in catalog");
        return Ok(catalog);
    };

    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = Catalog::from_json(&json)?;
    tracing::info!(
        path = %path.display(),
        products = catalog.len(),
        "Loaded catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocket_cart_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = builtin().unwrap();
        assert_eq!(catalog.len(), 6);

        let first = catalog.find(ProductId::new(1)).unwrap();
        assert_eq!(first.price, Decimal::new(100, 0));
        let second = catalog.find(ProductId::new(2)).unwrap();
        assert_eq!(second.price, Decimal::new(50, 0));
    }

    #[test]
    fn test_load_without_path_uses_builtin() {
        assert_eq!(load(None).unwrap(), builtin().unwrap());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id":9,"name":"Lamp","price":5.5,"image":"lamp.jpg","description":""}]"#,
        )
        .unwrap();

        let catalog = load(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.find(ProductId::new(9)).unwrap().price,
            Decimal::new(55, 1)
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Some(Path::new("/nonexistent/catalog.json"))).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Invalid(_)));
    }
}
