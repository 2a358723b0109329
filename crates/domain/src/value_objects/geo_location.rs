//! Geographic location value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A geographic location with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl GeoLocation {
    /// Create a new location with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates(format!(
                "latitude {latitude} must be -90 to 90, longitude {longitude} must be -180 to 180"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a location from decimal strings, as returned by geocoding services
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either value is not a number
    /// or is out of range.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, DomainError> {
        let lat: f64 = latitude
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidCoordinates(format!("latitude '{latitude}'")))?;
        let lon: f64 = longitude
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidCoordinates(format!("longitude '{longitude}'")))?;
        Self::new(lat, lon)
    }

    /// Create a location without validation (for trusted sources)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Well-known locations used as map defaults
impl GeoLocation {
    /// Bogota, Colombia
    #[must_use]
    pub const fn bogota() -> Self {
        Self::new_unchecked(4.7110, -74.0721)
    }

    /// Universidad de La Sabana campus (Chia)
    #[must_use]
    pub const fn universidad_de_la_sabana() -> Self {
        Self::new_unchecked(4.80923, -74.05701)
    }
}
