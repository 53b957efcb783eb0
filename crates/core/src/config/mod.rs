//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LINKPREVIEW_*)
//! 2. TOML config file (if LINKPREVIEW_CONFIG_FILE set)
//! 3. Built-in defaults

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LINKPREVIEW_*)
/// 2. TOML config file (if LINKPREVIEW_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding one JSON file per previewed URL.
    ///
    /// Never created by linkpreview; caching is skipped while it is missing.
    /// Set via LINKPREVIEW_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory searched for custom preview templates.
    ///
    /// Set via LINKPREVIEW_TEMPLATE_DIR environment variable.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Template filename used when the preview has an image.
    #[serde(default = "default_template_with_image")]
    pub template_with_image: String,

    /// Template filename used when the preview has no image.
    #[serde(default = "default_template_without_image")]
    pub template_without_image: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via LINKPREVIEW_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via LINKPREVIEW_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via LINKPREVIEW_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Site-wide values exposed to custom templates as `site.*`.
    ///
    /// Set as a `[site]` table in the TOML config file.
    #[serde(default)]
    pub site: BTreeMap<String, serde_json::Value>,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("_cache")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("_includes")
}

fn default_template_with_image() -> String {
    "linkpreview.html".into()
}

fn default_template_without_image() -> String {
    "linkpreview_nog.html".into()
}

fn default_user_agent() -> String {
    "linkpreview/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            template_dir: default_template_dir(),
            template_with_image: default_template_with_image(),
            template_without_image: default_template_without_image(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            site: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Full path of the custom template for previews with an image.
    pub fn template_with_image_path(&self) -> PathBuf {
        self.template_dir.join(&self.template_with_image)
    }

    /// Full path of the custom template for previews without an image.
    pub fn template_without_image_path(&self) -> PathBuf {
        self.template_dir.join(&self.template_without_image)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LINKPREVIEW_`
    /// 2. TOML file from `LINKPREVIEW_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LINKPREVIEW_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(Env::prefixed("LINKPREVIEW_").ignore(&["config_file"]));

        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
