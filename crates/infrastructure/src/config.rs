//! Application configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `config.toml` (or an explicit file), then `DRIVE2U_*` environment
//! variables. Nested keys use a double underscore, for example
//! `DRIVE2U_BACKEND__BASE_URL` or `DRIVE2U_SUGGESTIONS__DEBOUNCE_MS`.

use std::path::Path;

use application::{BoardConfig, SuggestionConfig};
use integration_backend::BackendConfig;
use integration_geocoding::NominatimConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::retry::RetryConfig;
use crate::telemetry::TelemetryConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "DRIVE2U";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Place search service
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Suggestion debounce and limits
    #[serde(default)]
    pub suggestions: SuggestionConfig,

    /// Map defaults
    #[serde(default)]
    pub map: BoardConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Backoff for the trip list load
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load from `config.toml` in the working directory (if present) and the
    /// environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(
            config::File::with_name("config").required(false),
            Self::environment(),
        )
    }

    /// Load from an explicit file, which must exist, and the environment
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(true), Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build<F>(file: F, env: config::Environment) -> Result<Self, config::ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate().map_err(config::ConfigError::Message)?;
        debug!(backend = %config.backend.base_url, "Configuration loaded");
        Ok(config)
    }

    /// Check every section, reporting the first problem
    pub fn validate(&self) -> Result<(), String> {
        self.backend
            .validate()
            .map_err(|e| format!("backend: {e}"))?;
        self.geocoding
            .validate()
            .map_err(|e| format!("geocoding: {e}"))?;
        self.retry.validate().map_err(|e| format!("retry: {e}"))?;
        self.telemetry
            .validate()
            .map_err(|e| format!("telemetry: {e}"))?;

        if self.suggestions.min_query_chars == 0 {
            return Err("suggestions: min_query_chars must be at least 1".to_string());
        }
        if self.suggestions.max_results == 0 {
            return Err("suggestions: max_results must be at least 1".to_string());
        }
        if self.map.zoom > 19 || self.map.focus_zoom > 19 {
            return Err("map: zoom levels must be within 0..=19".to_string());
        }
        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
