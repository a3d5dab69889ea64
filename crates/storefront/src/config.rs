//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory holding the persisted cart (default: data)
//! - `STOREFRONT_CART_KEY` - Storage key for the cart (default: cart)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog file (default: built-in catalog)
//! - `STOREFRONT_STATIC_DIR` - Static assets directory (default: crates/storefront/static)
//! - `STOREFRONT_CURRENCY` - ISO 4217 code used for display (default: INR)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use pocket_cart_core::CurrencyCode;
use pocket_cart_core::cart::DEFAULT_CART_KEY;
use thiserror::Error;

use crate::storage;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory backing the file store
    pub data_dir: PathBuf,
    /// Key the cart is stored under
    pub cart_key: String,
    /// Optional catalog file replacing the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Display currency for all prices
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: PathBuf::from("data"),
            cart_key: DEFAULT_CART_KEY.to_string(),
            catalog_path: None,
            static_dir: PathBuf::from("crates/storefront/static"),
            currency: CurrencyCode::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = match lookup("STOREFRONT_HOST") {
            Some(value) => value.parse::<IpAddr>().map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?,
            None => defaults.host,
        };
        let port = match lookup("STOREFRONT_PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?,
            None => defaults.port,
        };
        let cart_key = lookup("STOREFRONT_CART_KEY").unwrap_or(defaults.cart_key);
        storage::validate_key(&cart_key).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_CART_KEY".to_string(), e.to_string())
        })?;
        let currency = match lookup("STOREFRONT_CURRENCY") {
            Some(value) => value.parse::<CurrencyCode>().map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_CURRENCY".to_string(), e.to_string())
            })?,
            None => defaults.currency,
        };

        Ok(Self {
            host,
            port,
            data_dir: lookup("STOREFRONT_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            cart_key,
            catalog_path: lookup("STOREFRONT_CATALOG_PATH").map(PathBuf::from),
            static_dir: lookup("STOREFRONT_STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            currency,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cart_key, "cart");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.currency, CurrencyCode::INR);
        assert!(config.catalog_path.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_DATA_DIR", "/var/lib/pocket-cart"),
            ("STOREFRONT_CART_KEY", "shop_cart"),
            ("STOREFRONT_CATALOG_PATH", "catalog.json"),
            ("STOREFRONT_CURRENCY", "usd"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/pocket-cart"));
        assert_eq!(config.cart_key, "shop_cart");
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("STOREFRONT_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_cart_key() {
        let err = config_from(&[("STOREFRONT_CART_KEY", "../etc/passwd")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(name, reason) if name == "STOREFRONT_CART_KEY" && reason.contains("../etc/passwd"))
        );
        assert!(config_from(&[("STOREFRONT_CART_KEY", "")]).is_err());
    }

    #[test]
    fn test_invalid_currency() {
        assert!(config_from(&[("STOREFRONT_CURRENCY", "DOGE")]).is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_ignored() {
        let config = config_from(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
