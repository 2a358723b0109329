//! Place search error types

use thiserror::Error;

/// Errors that can occur during a place search
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to the geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status
    #[error("Geocoding request failed: HTTP {status}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
    },

    /// Failed to parse the geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Usage policy limit hit on the server side
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Invalid client configuration
    #[error("Geocoding configuration error: {0}")]
    ConfigurationError(String),
}

impl GeocodingError {
    /// Returns true if a later attempt may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } | Self::RateLimitExceeded => true,
            Self::RequestFailed { status } => *status >= 500,
            Self::ParseError(_) | Self::ConfigurationError(_) => false,
        }
    }
}
