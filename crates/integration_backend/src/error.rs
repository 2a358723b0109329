//! Backend error types

use thiserror::Error;

/// Errors that can occur when talking to the Drive2U backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection to the backend failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Missing, expired or rejected credentials (HTTP 401/403)
    #[error("Unauthorized (HTTP {status})")]
    Unauthorized {
        /// HTTP status code
        status: u16,
        /// Message from the response body, if any
        message: Option<String>,
    },

    /// The backend rejected the request
    #[error("Backend returned HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the response body, if any
        message: Option<String>,
    },

    /// Failed to parse the backend response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Response parsed but violates the data model
    #[error("Invalid data from backend: {0}")]
    InvalidData(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl BackendError {
    /// Returns true if repeating the request may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// HTTP status, for errors that carry one
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message the backend put in the error body, if any
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message, .. } | Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
