//! Integration errors to application errors

use application::ApplicationError;
use integration_backend::BackendError;
use integration_geocoding::GeocodingError;

/// Translate a backend failure
///
/// Rejections keep their status and server message so the user sees the
/// backend's own wording.
pub fn map_backend_error(error: BackendError) -> ApplicationError {
    match error {
        BackendError::ConnectionFailed(_) | BackendError::Timeout { .. } => {
            ApplicationError::Network(error.to_string())
        },
        BackendError::Unauthorized { status, message } | BackendError::Api { status, message } => {
            ApplicationError::Server { status, message }
        },
        BackendError::ParseError(_) | BackendError::InvalidData(_) => {
            ApplicationError::Internal(format!("Unexpected backend response: {error}"))
        },
        BackendError::ConfigurationError(message) => ApplicationError::Configuration(message),
    }
}

/// Translate a place search failure
pub fn map_geocoding_error(error: GeocodingError) -> ApplicationError {
    match error {
        GeocodingError::ConfigurationError(message) => ApplicationError::Configuration(message),
        other => ApplicationError::ExternalService(other.to_string()),
    }
}
