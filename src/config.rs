//! Configuration loading.
//!
//! Settings come from an optional TOML file, then `PROPERTY_GENIE_*`
//! environment variables override individual values. Anything missing falls
//! back to a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "property-genie.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote listing API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://agents.propertygenie.com.my/api/properties-mock".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("property-genie/{}", env!("CARGO_PKG_VERSION"))
}

/// Listing presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    /// How long a fetched dataset is reused for the same sort order
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Base printed in front of the query string for shareable links
    #[serde(default = "default_share_base")]
    pub share_base: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            cache_ttl_secs: default_cache_ttl_secs(),
            share_base: default_share_base(),
        }
    }
}

fn default_per_page() -> usize {
    12
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_share_base() -> String {
    "/".to_string()
}

/// Local saved-search storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

impl Config {
    /// Load from `path`; a missing or empty file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from `path`, apply environment overrides and validate
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("PROPERTY_GENIE_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("PROPERTY_GENIE_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid PROPERTY_GENIE_TIMEOUT_SECS '{}'", timeout),
            }
        }
        if let Some(per_page) = var("PROPERTY_GENIE_PER_PAGE") {
            match per_page.parse() {
                Ok(n) => self.listing.per_page = n,
                Err(_) => warn!("Ignoring invalid PROPERTY_GENIE_PER_PAGE '{}'", per_page),
            }
        }
        if let Some(ttl) = var("PROPERTY_GENIE_CACHE_TTL_SECS") {
            match ttl.parse() {
                Ok(secs) => self.listing.cache_ttl_secs = secs,
                Err(_) => warn!("Ignoring invalid PROPERTY_GENIE_CACHE_TTL_SECS '{}'", ttl),
            }
        }
        if let Some(dir) = var("PROPERTY_GENIE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.per_page == 0 {
            return Err(ConfigError::Validation(
                "listing.per_page must be at least 1".to_string(),
            ));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        Ok(())
    }
}
