//! Trip creation payload
//!
//! Mirrors the driver's "register a trip" form: origin, destination,
//! departure time, 1 to 4 seats, a non-negative fare and an optional route.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;

/// Maximum seats a driver may offer on a single trip
pub const MAX_OFFERED_PLACES: u32 = 4;

/// A validated trip offer ready to be published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewTrip {
    /// Free-text origin
    #[validate(length(min = 1, message = "start location is required"))]
    pub start_location: String,

    /// Free-text destination
    #[validate(length(min = 1, message = "destination is required"))]
    pub end_trip: String,

    /// Departure time of day
    pub time_trip: NaiveTime,

    /// Seats offered
    #[validate(range(min = 1, max = 4, message = "offered places must be between 1 and 4"))]
    pub available_places: u32,

    /// Fare per passenger
    #[validate(range(min = 0.0, message = "fare must not be negative"))]
    pub price_trip: f64,

    /// Optional route description
    pub route: Option<String>,
}

impl NewTrip {
    /// Build a trip offer from form input
    ///
    /// `time_trip` must be `HH:MM`. Text fields are trimmed; a blank route
    /// becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateTime` for a malformed time and `ValidationError`
    /// for any other invalid field.
    pub fn new(
        start_location: &str,
        end_trip: &str,
        time_trip: &str,
        available_places: u32,
        price_trip: f64,
        route: Option<&str>,
    ) -> Result<Self, DomainError> {
        let time = NaiveTime::parse_from_str(time_trip.trim(), "%H:%M")
            .map_err(|e| DomainError::InvalidDateTime(format!("{time_trip}: {e}")))?;

        if !price_trip.is_finite() {
            return Err(DomainError::validation("fare must be a number"));
        }

        let candidate = Self {
            start_location: start_location.trim().to_string(),
            end_trip: end_trip.trim().to_string(),
            time_trip: time,
            available_places,
            price_trip,
            route: route
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        };

        candidate
            .validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        Ok(candidate)
    }

    /// Departure time formatted as `HH:MM`
    #[must_use]
    pub fn time_label(&self) -> String {
        self.time_trip.format("%H:%M").to_string()
    }
}
