//! Trip adapter - Implements TripPort using integration_backend

use std::sync::Arc;

use application::ApplicationError;
use application::ports::TripPort;
use async_trait::async_trait;
use domain::{NewTrip, ReservationConfirmation, ReservationRequest, Trip, TripId};
use integration_backend::BackendClient;
use secrecy::SecretString;
use tracing::{debug, instrument};

use super::error_mapping::map_backend_error;
use crate::retry::{RetryConfig, retry};

/// Adapter for the backend trip endpoints
///
/// The trip list is retried with backoff; writes are sent exactly once.
pub struct BackendTripAdapter {
    client: Arc<dyn BackendClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for BackendTripAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendTripAdapter")
            .field("client", &"dyn BackendClient")
            .field("retry", &self.retry)
            .finish()
    }
}

impl BackendTripAdapter {
    /// Create a new trip adapter with the default backoff
    pub fn new(client: Arc<dyn BackendClient>) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
        }
    }

    /// Replace the backoff used for the trip list
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl TripPort for BackendTripAdapter {
    #[instrument(skip(self, token))]
    async fn list_trips(&self, token: &SecretString) -> Result<Vec<Trip>, ApplicationError> {
        let client = &self.client;
        let trips = retry(&self.retry, || async move {
            client.list_trips(token).await.map_err(map_backend_error)
        })
        .await?;

        debug!(count = trips.len(), "Trips loaded");
        Ok(trips)
    }

    #[instrument(skip(self, token, request), fields(trip_id = %trip_id))]
    async fn reserve(
        &self,
        token: &SecretString,
        trip_id: &TripId,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, ApplicationError> {
        self.client
            .reserve(token, trip_id, request)
            .await
            .map_err(map_backend_error)
    }

    #[instrument(skip(self, token, trip))]
    async fn create_trip(
        &self,
        token: &SecretString,
        trip: &NewTrip,
    ) -> Result<TripId, ApplicationError> {
        self.client
            .create_trip(token, trip)
            .await
            .map_err(map_backend_error)
    }
}
