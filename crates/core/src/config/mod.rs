//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Command line overrides
//! 2. Environment variables (WMCR_*)
//! 3. Config file (WALLMANCER_CONFIG_FILE, or `config.yml` in the user config dir)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Environment variable prefix, shared with the config file keys.
pub const ENV_PREFIX: &str = "WMCR_";

/// Environment variable naming an explicit config file.
pub const CONFIG_FILE_ENV: &str = "WALLMANCER_CONFIG_FILE";

const APP_DIR: &str = "wallmancer";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. [`ConfigOverrides`] from the command line
/// 2. Environment variables (WMCR_*)
/// 3. YAML or TOML config file
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Wallpaper provider name.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// wallhaven.cc API key. Stripped from cache signatures and logs.
    #[serde(default)]
    pub apikey: Option<String>,

    /// wallhaven.cc username. Accepted so existing `config.yml` files and
    /// `--username` keep loading; no request reads it.
    #[serde(default)]
    pub username: Option<String>,

    /// Include NSFW results.
    #[serde(default)]
    pub nsfw: bool,

    /// Fixed seed for random sorting; a fresh one is generated when unset.
    #[serde(default)]
    pub seed: Option<String>,

    /// Cache TTL in seconds.
    #[serde(default = "default_expiry")]
    pub expiry: u64,

    /// Maximum pages fetched per query.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Search endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Cache directory; defaults to the platform cache dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_provider() -> String {
    "wallhaven".into()
}

fn default_expiry() -> u64 {
    600
}

fn default_max_pages() -> u32 {
    5
}

fn default_base_url() -> String {
    "https://wallhaven.cc/api/v1/search".into()
}

fn default_user_agent() -> String {
    concat!("wallmancer/", env!("CARGO_PKG_VERSION")).into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            apikey: None,
            username: None,
            nsfw: false,
            seed: None,
            expiry: default_expiry(),
            max_pages: default_max_pages(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_dir: None,
        }
    }
}

/// Values supplied on the command line. `None` leaves lower layers untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

impl AppConfig {
    /// Cache TTL as Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.expiry)
    }

    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be parsed
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let config_file = std::env::var_os(CONFIG_FILE_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_config_file);

        Self::from_figment(Self::figment(config_file.as_deref(), overrides))
    }

    /// Assemble the provider stack without extracting it.
    pub fn figment(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "reading config file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                _ => figment.merge(Yaml::file(path)),
            };
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()))
            .merge(Serialized::defaults(overrides))
    }

    /// Extract and validate a configuration from an assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// `config.yml` in the platform config directory.
    pub fn default_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yml"))
    }

    /// Configured cache directory, falling back to the platform cache dir.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if neither is available.
    pub fn cache_root(&self) -> Result<PathBuf, ConfigError> {
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_DIR)))
            .ok_or_else(|| ConfigError::Missing {
                field: "cache_dir".into(),
                hint: "Set WMCR_CACHE_DIR or cache_dir in config.yml".into(),
            })
    }
}
