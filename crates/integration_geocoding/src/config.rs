//! Nominatim client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the Nominatim place search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in minutes (0 to disable)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,

    /// Maximum number of cached queries
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Comma-separated ISO country codes to restrict results to (empty for none)
    #[serde(default = "default_country_filter")]
    pub country_filter: String,

    /// Minimum spacing between requests in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// User-Agent sent with every request, required by the usage policy
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_cache_ttl_minutes() -> u64 {
    60
}

const fn default_cache_capacity() -> u64 {
    500
}

fn default_country_filter() -> String {
    "co".to_string()
}

const fn default_min_interval_ms() -> u64 {
    1_000
}

fn default_user_agent() -> String {
    concat!("Drive2U/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            cache_capacity: default_cache_capacity(),
            country_filter: default_country_filter(),
            min_interval_ms: default_min_interval_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_minutes: 0,
            min_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0 && self.cache_capacity > 0
    }

    /// Cache entry lifetime
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes * 60)
    }

    /// Minimum spacing between requests
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("base_url '{}' is not a valid URL", self.base_url));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        Ok(())
    }
}
