//! Application configuration
//!
//! Settings are read from a TOML file with three sections: `[api]`, `[cache]`
//! and `[branding]`. Every field has a default, so an empty or missing file is
//! a valid configuration. The API key may also come from `RIDEAU_API_KEY`.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides `api.key`
pub const API_KEY_ENV: &str = "RIDEAU_API_KEY";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Root application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Listings API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Cache location and lifetimes
    #[serde(default)]
    pub cache: CacheConfig,

    /// Office details used when the API leaves fields blank
    #[serde(default)]
    pub branding: Branding,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads configuration or returns defaults if loading fails
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Config load failed from {:?}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    /// Default config file location (`~/.config/rideau/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rideau").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Applies environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.key = key;
            }
        }
        self
    }
}

/// Listings API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the listings API
    pub base_url: String,
    /// Value for the `x-rapidapi-host` header
    pub host: String,
    /// Value for the `x-rapidapi-key` header
    pub key: String,
    /// Organization whose listings are requested
    pub organization_id: u64,
    /// Page size for the listings page
    pub records_per_page: u32,
    /// Page size used when picking a featured listing without a cached page
    pub featured_records_per_page: u32,
    /// `A` or `D`
    pub sort_order: String,
    /// API sort field id
    pub sort_by: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://realty-in-ca1.p.rapidapi.com".to_string(),
            host: "realty-in-ca1.p.rapidapi.com".to_string(),
            key: String::new(),
            organization_id: 56031,
            records_per_page: 50,
            featured_records_per_page: 100,
            sort_order: "D".to_string(),
            sort_by: 1,
        }
    }
}

/// Cache location and entry lifetimes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory for cache files; the XDG cache dir when unset
    pub dir: Option<PathBuf>,
    /// Prefix for every cache key
    pub namespace: String,
    /// Lifetime of the cached listings page
    pub listings_ttl_minutes: u64,
    /// Lifetime of the featured listing pick
    pub featured_ttl_minutes: u64,
    /// Lifetime of cached detail records
    pub details_ttl_minutes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            namespace: crate::cache::DEFAULT_NAMESPACE.to_string(),
            listings_ttl_minutes: 10,
            featured_ttl_minutes: 60,
            details_ttl_minutes: 10,
        }
    }
}

/// Office details used to fill gaps in API records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    /// Contact name when a listing has no agent
    pub office_name: String,
    /// Contact phone when an agent has no phone
    pub office_phone: String,
    /// Placeholder address for agents with a contact id
    pub agent_email: String,
    /// Region named in fallback titles
    pub region: String,
    /// Short region name for detail titles without a city
    pub region_short: String,
    /// Province assumed for summary listings
    pub province: String,
    /// Description for listings without remarks
    pub default_description: String,
    /// Image for listings without photos
    pub fallback_image: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            office_name: "Rideau Realty Team".to_string(),
            office_phone: "(613) 272-5000".to_string(),
            agent_email: "agent@rideaurealty.ca".to_string(),
            region: "Rideau Lakes Region".to_string(),
            region_short: "Rideau Lakes".to_string(),
            province: "Ontario".to_string(),
            default_description: "Beautiful property in the Rideau Lakes region.".to_string(),
            fallback_image: "https://images.unsplash.com/photo-1564013799919-ab600027ffc6?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80".to_string(),
        }
    }
}
