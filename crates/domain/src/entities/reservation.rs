//! Reservation request and confirmation
//!
//! A reservation asks for `requested_places` seats on a trip together with an
//! ordered list of pickup/drop points. Seat bounds are checked against the
//! trip's free seats before anything is sent to the backend.
//!
//! Pickup/drop point policy: entries are trimmed and blank entries dropped;
//! at least one point must remain. If there are more points than seats, the
//! list is truncated to `requested_places`. Fewer points than seats are sent
//! unchanged.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::TripId;

/// A validated request to occupy seats on a trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    requested_places: u32,
    pickup_drop_points: Vec<String>,
}

impl ReservationRequest {
    /// Build a request, validating it against the trip's free seats
    ///
    /// # Errors
    ///
    /// Returns a validation error if `requested_places` is zero, exceeds
    /// `available_places`, or if no non-blank pickup/drop point is given.
    pub fn new(
        requested_places: u32,
        pickup_drop_points: &[String],
        available_places: u32,
    ) -> Result<Self, DomainError> {
        Self::check_places(requested_places, available_places)?;

        let mut points: Vec<String> = pickup_drop_points
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if points.is_empty() {
            return Err(DomainError::validation(
                "at least one pickup/drop point is required",
            ));
        }

        points.truncate(requested_places as usize);

        Ok(Self {
            requested_places,
            pickup_drop_points: points,
        })
    }

    /// Check that `requested_places` lies in `1..=available_places`
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the violated bound.
    pub fn check_places(requested_places: u32, available_places: u32) -> Result<(), DomainError> {
        if requested_places == 0 {
            return Err(DomainError::validation(
                "requested places must be at least 1",
            ));
        }
        if requested_places > available_places {
            return Err(DomainError::validation(format!(
                "requested {requested_places} places but only {available_places} available"
            )));
        }
        Ok(())
    }

    /// Number of seats requested
    pub const fn requested_places(&self) -> u32 {
        self.requested_places
    }

    /// Ordered pickup/drop points
    pub fn pickup_drop_points(&self) -> &[String] {
        &self.pickup_drop_points
    }
}

/// Backend acknowledgement of a created reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationConfirmation {
    /// Identifier assigned by the backend
    pub reservation_id: String,
    /// Trip the seats were reserved on
    pub trip_id: TripId,
    /// Seats taken by this reservation
    pub seats: u32,
}
