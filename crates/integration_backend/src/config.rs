//! Backend client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Drive2U REST backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://proyecto-final-be-un-bof.vercel.app".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("Drive2U/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl BackendConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 5,
            ..Default::default()
        }
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
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("base_url '{}' is not a valid URL: {e}", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("base_url scheme '{}' is not http(s)", parsed.scheme()));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "https://proyecto-final-be-un-bof.vercel.app");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_config() {
        let config = BackendConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let empty = BackendConfig {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(empty.validate().is_err());

        let ftp = BackendConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(ftp.validate().unwrap_err().contains("ftp"));

        let zero = BackendConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = BackendConfig::for_testing();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: BackendConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }
}
