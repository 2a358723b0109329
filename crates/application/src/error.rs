//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Message shown when the server gives no usable reason for a failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Could not complete the request. Please try again.";

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (validation, unknown entity, ...)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The request never reached the server or no response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server error (HTTP {status}): {}", .message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Server {
        /// HTTP status code
        status: u16,
        /// Message from the server's error payload, if any
        message: Option<String>,
    },

    /// No session token is available
    #[error("Not authenticated: please sign in again")]
    NotAuthenticated,

    /// Operation not allowed in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// External enhancement service error (e.g. geocoding)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::ExternalService(_) => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Whether the error comes from input validation (no request was sent)
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::ValidationError(_) | DomainError::InvalidDateTime(_))
        )
    }

    /// Message suitable for a user-facing notification
    ///
    /// Server messages are passed through verbatim; network and unexpected
    /// failures fall back to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Domain(e) => e.to_string(),
            Self::NotAuthenticated => self.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
