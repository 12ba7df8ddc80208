//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_API_BASE_URL` - Product Store base URL (default: `http://localhost:7000`)
//! - `SHOPFRONT_API_SCHEMA` - Wire dialect, `backend` or `fakestore` (default: backend)
//! - `SHOPFRONT_API_BEARER` - Send the session token as a bearer header (default: false)
//! - `SHOPFRONT_DATA_DIR` - Directory holding the local storage file (default: `.shopfront`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::api::ApiSchema;

const DEFAULT_API_BASE_URL: &str = "http://localhost:7000";
const DEFAULT_DATA_DIR: &str = ".shopfront";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product Store API configuration
    pub api: ProductStoreConfig,
    /// Directory holding the durable local storage file
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Product Store API configuration.
#[derive(Debug, Clone)]
pub struct ProductStoreConfig {
    /// Base URL every API path is joined onto
    pub base_url: Url,
    /// Which JSON dialect the store speaks
    pub schema: ApiSchema,
    /// Attach the session token as `Authorization: Bearer`
    pub bearer_auth: bool,
}

impl ProductStoreConfig {
    /// Configuration for a store at `base_url`, without bearer auth.
    #[must_use]
    pub const fn new(base_url: Url, schema: ApiSchema) -> Self {
        Self {
            base_url,
            schema,
            bearer_auth: false,
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
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = parse_base_url(
            "SHOPFRONT_API_BASE_URL",
            &get_or_default(&lookup, "SHOPFRONT_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let schema = get_or_default(&lookup, "SHOPFRONT_API_SCHEMA", "backend")
            .parse::<ApiSchema>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_API_SCHEMA".to_string(), e))?;
        let bearer_auth = parse_bool(
            "SHOPFRONT_API_BEARER",
            &get_or_default(&lookup, "SHOPFRONT_API_BEARER", "false"),
        )?;
        let data_dir = PathBuf::from(get_or_default(&lookup, "SHOPFRONT_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            api: ProductStoreConfig {
                base_url,
                schema,
                bearer_auth,
            },
            data_dir,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key)).unwrap_or_else(|| default.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse the API base URL, making sure relative joins keep its path.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:7000/");
        assert_eq!(config.api.schema, ApiSchema::Backend);
        assert!(!config.api.bearer_auth);
        assert_eq!(config.data_dir, PathBuf::from(".shopfront"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_fakestore_schema() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("SHOPFRONT_API_BASE_URL", "https://fakestoreapi.com"),
            ("SHOPFRONT_API_SCHEMA", "fakestore"),
            ("SHOPFRONT_API_BEARER", "yes"),
        ]))
        .unwrap();
        assert_eq!(config.api.schema, ApiSchema::FakeStore);
        assert!(config.api.bearer_auth);
    }

    #[test]
    fn test_invalid_schema() {
        let result =
            StorefrontConfig::from_lookup(lookup_from(&[("SHOPFRONT_API_SCHEMA", "graphql")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "SHOPFRONT_API_SCHEMA"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result =
            StorefrontConfig::from_lookup(lookup_from(&[("SHOPFRONT_API_BASE_URL", "not a url")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let url = parse_base_url("K", "http://example.com/shop").unwrap();
        assert_eq!(url.join("api/products").unwrap().as_str(), "http://example.com/shop/api/products");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("K", "TRUE").unwrap());
        assert!(!parse_bool("K", "off").unwrap());
        assert!(parse_bool("K", "maybe").is_err());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config =
            StorefrontConfig::from_lookup(lookup_from(&[("SHOPFRONT_DATA_DIR", "  "), ("SENTRY_DSN", "")]))
                .unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".shopfront"));
        assert!(config.sentry_dsn.is_none());
    }
}
