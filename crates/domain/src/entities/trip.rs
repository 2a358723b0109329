//! Trip entity
//!
//! A driver-published ride offer. Trips are owned by the backend; the client
//! holds a read-mostly copy whose only local mutation is the seat decrement
//! after a confirmed reservation.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{GeoLocation, TripId};

/// A ride offer published by a driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Backend identifier
    pub id: TripId,
    /// Free-text origin
    pub start_location: String,
    /// Free-text destination
    pub end_trip: String,
    /// Origin coordinates, when the driver picked a geocoded place
    pub start_location_coords: Option<GeoLocation>,
    /// Destination coordinates, when the driver picked a geocoded place
    pub end_trip_coords: Option<GeoLocation>,
    /// Departure time of day as entered by the driver (e.g. "07:30")
    pub time_trip: String,
    /// Seats still free
    pub available_places: u32,
    /// Fare per passenger
    pub price_trip: f64,
    /// Optional route description
    pub route: Option<String>,
}

impl Trip {
    /// Create a trip without coordinates or route
    ///
    /// # Errors
    ///
    /// Returns a validation error if the fare is negative or not a number.
    pub fn new(
        id: TripId,
        start_location: impl Into<String>,
        end_trip: impl Into<String>,
        time_trip: impl Into<String>,
        available_places: u32,
        price_trip: f64,
    ) -> Result<Self, DomainError> {
        if !price_trip.is_finite() || price_trip < 0.0 {
            return Err(DomainError::validation(format!(
                "trip fare must be a non-negative amount, got {price_trip}"
            )));
        }

        Ok(Self {
            id,
            start_location: start_location.into(),
            end_trip: end_trip.into(),
            start_location_coords: None,
            end_trip_coords: None,
            time_trip: time_trip.into(),
            available_places,
            price_trip,
            route: None,
        })
    }

    /// Attach origin and destination coordinates
    #[must_use]
    pub const fn with_coords(
        mut self,
        start: Option<GeoLocation>,
        end: Option<GeoLocation>,
    ) -> Self {
        self.start_location_coords = start;
        self.end_trip_coords = end;
        self
    }

    /// Attach a route description; blank routes are dropped
    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        let route = route.into();
        self.route = if route.trim().is_empty() {
            None
        } else {
            Some(route)
        };
        self
    }

    /// Whether the trip can take `seats` more passengers
    #[must_use]
    pub const fn has_capacity_for(&self, seats: u32) -> bool {
        seats <= self.available_places
    }

    /// Whether the trip is fully booked
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.available_places == 0
    }

    /// Remove `seats` from the free seat count, saturating at zero
    ///
    /// Returns the number of seats that could not be taken because the
    /// cached count was already lower than the confirmed reservation.
    pub const fn take_seats(&mut self, seats: u32) -> u32 {
        let shortfall = seats.saturating_sub(self.available_places);
        self.available_places = self.available_places.saturating_sub(seats);
        shortfall
    }

    /// Departure time parsed from `time_trip`
    ///
    /// Accepts `HH:MM` and `HH:MM:SS`; returns `None` for anything else.
    #[must_use]
    pub fn departure_time(&self) -> Option<NaiveTime> {
        let raw = self.time_trip.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
    }
}
