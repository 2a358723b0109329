//! Backend trip service port
//!
//! Read access to the published trips plus the two write operations a
//! client performs: reserving seats and publishing a new trip.

use async_trait::async_trait;
use domain::{NewTrip, ReservationConfirmation, ReservationRequest, Trip, TripId};
#[cfg(test)]
use mockall::automock;
use secrecy::SecretString;

use crate::error::ApplicationError;

/// Port for the backend trip API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TripPort: Send + Sync {
    /// Fetch every published trip
    async fn list_trips(&self, token: &SecretString) -> Result<Vec<Trip>, ApplicationError>;

    /// Reserve seats on a trip
    async fn reserve(
        &self,
        token: &SecretString,
        trip_id: &TripId,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, ApplicationError>;

    /// Publish a new trip and return its identifier
    async fn create_trip(
        &self,
        token: &SecretString,
        trip: &NewTrip,
    ) -> Result<TripId, ApplicationError>;
}
