//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Persistence slot key (default: `nutrijoseph_cart`)
//! - `CART_DATA_DIR` - Directory for the file-backed store (default: `.nutrijoseph`)
//! - `CART_CURRENCY` - Display currency, one of `PEN`, `USD`, `EUR` (default: `PEN`)

use std::path::PathBuf;

use nutrijoseph_core::CurrencyCode;
use thiserror::Error;

/// Default persistence slot key.
pub const DEFAULT_STORAGE_KEY: &str = "nutrijoseph_cart";

/// Default data directory for file-backed storage.
pub const DEFAULT_DATA_DIR: &str = ".nutrijoseph";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key of the persistence slot holding the serialized cart
    pub storage_key: String,
    /// Directory where the file-backed store keeps its data
    pub data_dir: PathBuf,
    /// Currency used when formatting prices for display
    pub currency: CurrencyCode,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            currency: CurrencyCode::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_key = get_or_default(&lookup, "CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be blank".to_string(),
            ));
        }

        let data_dir = PathBuf::from(get_or_default(&lookup, "CART_DATA_DIR", DEFAULT_DATA_DIR));

        let currency = get_or_default(&lookup, "CART_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_CURRENCY".to_string(), e.to_string()))?;

        Ok(Self {
            storage_key,
            data_dir,
            currency,
        })
    }
}

fn get_or_default<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CartConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "nutrijoseph_cart");
        assert_eq!(config.currency, CurrencyCode::PEN);
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("CART_STORAGE_KEY", "shop_cart"),
            ("CART_DATA_DIR", "/tmp/cart"),
            ("CART_CURRENCY", "usd"),
        ]))
        .unwrap();
        assert_eq!(config.storage_key, "shop_cart");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_invalid_currency() {
        let err = CartConfig::from_lookup(lookup_from(&[("CART_CURRENCY", "GBP")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "CART_CURRENCY"));
    }

    #[test]
    fn test_blank_storage_key_rejected() {
        let err = CartConfig::from_lookup(lookup_from(&[("CART_STORAGE_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "CART_STORAGE_KEY"));
    }
}
