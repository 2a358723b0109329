//! Construction of the port adapters from configuration

use std::sync::Arc;

use application::ApplicationError;
use application::ports::{AuthPort, GeocodingPort, TripPort};
use integration_backend::{BackendClient, HttpBackendClient};
use integration_geocoding::{NominatimClient, PlaceSearchClient};
use tracing::info;

use crate::adapters::{
    BackendAuthAdapter, BackendTripAdapter, NominatimGeocodingAdapter, map_backend_error,
    map_geocoding_error,
};
use crate::config::AppConfig;

/// Ready-to-use port implementations
#[derive(Clone)]
pub struct Adapters {
    /// Login and profile
    pub auth: Arc<dyn AuthPort>,
    /// Trip list, reservations, trip publication
    pub trips: Arc<dyn TripPort>,
    /// Place search
    pub geocoder: Arc<dyn GeocodingPort>,
}

impl std::fmt::Debug for Adapters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapters").finish_non_exhaustive()
    }
}

impl Adapters {
    /// Build HTTP clients and adapters for `config`
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        let backend: Arc<dyn BackendClient> =
            Arc::new(HttpBackendClient::new(&config.backend).map_err(map_backend_error)?);
        let places: Arc<dyn PlaceSearchClient> =
            Arc::new(NominatimClient::new(&config.geocoding).map_err(map_geocoding_error)?);

        info!(
            backend = %config.backend.base_url,
            geocoder = %config.geocoding.base_url,
            "Adapters initialized"
        );

        Ok(Self {
            auth: Arc::new(BackendAuthAdapter::new(Arc::clone(&backend))),
            trips: Arc::new(BackendTripAdapter::new(backend).with_retry(config.retry.clone())),
            geocoder: Arc::new(NominatimGeocodingAdapter::new(places)),
        })
    }
}
