//! Trip identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Identifier of a trip as assigned by the backend
///
/// The backend issues opaque string identifiers, so no format is assumed
/// beyond being non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Create a trip ID from a backend identifier
    ///
    /// # Errors
    ///
    /// Returns a validation error if the identifier is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(DomainError::validation("trip id must not be empty"));
        }
        Ok(Self(id))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TripId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TripId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_id_is_trimmed() {
        let id = TripId::new("  9fQ2xk  ").unwrap();
        assert_eq!(id.as_str(), "9fQ2xk");
        assert_eq!(id.to_string(), "9fQ2xk");
    }

    #[test]
    fn blank_trip_id_is_rejected() {
        assert!(TripId::new("").is_err());
        assert!(TripId::new("   ").is_err());
    }

    #[test]
    fn trip_id_serializes_as_plain_string() {
        let id = TripId::new("trip-7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"trip-7\"");
    }
}
