//! Geocoding adapter - Implements GeocodingPort using integration_geocoding

use std::sync::Arc;

use application::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::PlaceSuggestion;
use integration_geocoding::PlaceSearchClient;
use tracing::instrument;

use super::error_mapping::map_geocoding_error;

/// Adapter for Nominatim place search
pub struct NominatimGeocodingAdapter {
    client: Arc<dyn PlaceSearchClient>,
}

impl std::fmt::Debug for NominatimGeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocodingAdapter")
            .field("client", &"dyn PlaceSearchClient")
            .finish()
    }
}

impl NominatimGeocodingAdapter {
    /// Create a new geocoding adapter
    pub fn new(client: Arc<dyn PlaceSearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GeocodingPort for NominatimGeocodingAdapter {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        limit: u8,
        language: &str,
    ) -> Result<Vec<PlaceSuggestion>, ApplicationError> {
        self.client
            .search(query, limit, language)
            .await
            .map_err(map_geocoding_error)
    }
}

#[cfg(test)]
mod tests {
    use domain::GeoLocation;
    use integration_geocoding::GeocodingError;
    use mockall::mock;

    use super::*;

    mock! {
        pub PlaceSearch {}

        #[async_trait::async_trait]
        impl PlaceSearchClient for PlaceSearch {
            async fn search(&self, query: &str, limit: u8, language: &str) -> Result<Vec<PlaceSuggestion>, GeocodingError>;
        }
    }

    #[tokio::test]
    async fn forwards_query_limit_and_language() {
        let mut client = MockPlaceSearch::new();
        client
            .expect_search()
            .withf(|query, limit, language| query == "Chía" && *limit == 5 && language == "es")
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![PlaceSuggestion::new(
                    "Chía, Sabana Centro, Cundinamarca, Colombia",
                    GeoLocation::new(4.8619, -74.0328).unwrap(),
                )])
            });

        let adapter = NominatimGeocodingAdapter::new(Arc::new(client));
        let places = adapter.search("Chía", 5, "es").await.unwrap();
        assert_eq!(places[0].short_name(), "Chía");
    }

    #[tokio::test]
    async fn failures_become_external_service_errors() {
        let mut client = MockPlaceSearch::new();
        client
            .expect_search()
            .returning(|_, _, _| Err(GeocodingError::RequestFailed { status: 503 }));

        let adapter = NominatimGeocodingAdapter::new(Arc::new(client));
        let err = adapter.search("Suba", 5, "es").await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }
}
