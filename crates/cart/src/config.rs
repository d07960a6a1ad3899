//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_API_URL` - Base URL of the catalog service (default: `http://localhost:3333`)
//! - `CART_STORAGE_PATH` - File backing the cart storage (default: `rocketshoes-storage.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = "rocketshoes-storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Base URL of the catalog service
    pub api_url: Url,
    /// File holding persisted storage blobs
    pub storage_path: PathBuf,
}

impl CartConfig {
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

        Self::from_vars(
            get_optional_env("CART_API_URL").as_deref(),
            get_optional_env("CART_STORAGE_PATH").as_deref(),
        )
    }

    /// Build configuration from raw values, applying defaults for `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is invalid.
    pub fn from_vars(api_url: Option<&str>, storage_path: Option<&str>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(api_url.unwrap_or(DEFAULT_API_URL))?;

        let storage_path = storage_path.unwrap_or(DEFAULT_STORAGE_PATH);
        if storage_path.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_PATH".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            storage_path: PathBuf::from(storage_path),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse and normalise the catalog base URL.
///
/// The result always ends in `/` so relative joins keep any path prefix.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("CART_API_URL".to_string(), reason);

    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
