//! Configuration management for menuprefs.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::catalog::{default_spec, CatalogSpec};
use crate::error::{Error, Result};
use crate::prefs::PortalVariant;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "menuprefs";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MENUPREFS_`)
/// 2. TOML config file at `~/.config/menuprefs/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferences backend configuration.
    pub api: ApiConfig,
    /// Autosave configuration.
    pub autosave: AutosaveConfig,
    /// Optional catalog spec overrides per portal.
    pub catalog: CatalogOverrides,
}

/// Preferences-backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the preferences backend.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Autosave configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Debounce window between the last edit and the save, in
    /// milliseconds.
    pub debounce_ms: u64,
}

/// Per-portal overrides of the built-in catalog specs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogOverrides {
    /// Override for the staff CRM portal.
    pub crm: Option<CatalogSpec>,
    /// Override for the end-client portal.
    pub client: Option<CatalogSpec>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("MENUPREFS_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(Error::ConfigValidation {
                message: "api.base_url must not be empty".to_string(),
            });
        }
        if self.api.timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "api.timeout_ms must be greater than 0".to_string(),
            });
        }
        if self.autosave.debounce_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "autosave.debounce_ms must be greater than 0".to_string(),
            });
        }
        if let Some(spec) = &self.catalog.crm {
            spec.validate()
                .map_err(|message| Error::catalog_invalid("crm", message))?;
        }
        if let Some(spec) = &self.catalog.client {
            spec.validate()
                .map_err(|message| Error::catalog_invalid("client", message))?;
        }
        Ok(())
    }

    /// The catalog spec for a portal: the configured override or the
    /// built-in default.
    #[must_use]
    pub fn catalog_spec(&self, portal: PortalVariant) -> CatalogSpec {
        let override_spec = match portal {
            PortalVariant::Crm => self.catalog.crm.clone(),
            PortalVariant::Client => self.catalog.client.clone(),
        };
        override_spec.unwrap_or_else(|| default_spec(portal))
    }

    /// Get the autosave debounce as a Duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.autosave.debounce_ms)
    }

    /// Get the backend request timeout as a Duration.
    #[must_use]
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }
}
