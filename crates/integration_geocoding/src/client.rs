//! Nominatim place search client
//!
//! Requests are spaced by `min_interval_ms` (1 request per second on the
//! public instance) and answers are cached per query, limit and language.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::PlaceSuggestion;
use moka::future::Cache;
use reqwest::{Client, StatusCode, header};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::config::NominatimConfig;
use crate::error::GeocodingError;
use crate::models::NominatimPlace;

/// Trait for place search clients
#[async_trait]
pub trait PlaceSearchClient: Send + Sync {
    /// Search places matching `query`, best match first
    ///
    /// At most `limit` results are returned, with names localized for
    /// `language` when the service supports it.
    async fn search(
        &self,
        query: &str,
        limit: u8,
        language: &str,
    ) -> Result<Vec<PlaceSuggestion>, GeocodingError>;
}

type CacheKey = (String, u8, String);

/// Nominatim-based place search with rate limiting and caching
#[derive(Debug)]
pub struct NominatimClient {
    client: Client,
    config: NominatimConfig,
    search_url: url::Url,
    cache: Option<Cache<CacheKey, Vec<PlaceSuggestion>>>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimClient {
    /// Create a new Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        config
            .validate()
            .map_err(GeocodingError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let search_url = url::Url::parse(&format!(
            "{}/search",
            config.base_url.trim_end_matches('/')
        ))
        .map_err(|e| GeocodingError::ConfigurationError(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(config.cache_capacity)
                .time_to_live(config.cache_ttl())
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            search_url,
            cache,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Wait until the minimum spacing since the previous request has passed
    async fn rate_limit(&self) {
        let min_interval = self.config.min_interval();
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                let wait = min_interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting place search");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn fetch(
        &self,
        query: &str,
        limit: u8,
        language: &str,
    ) -> Result<Vec<PlaceSuggestion>, GeocodingError> {
        self.rate_limit().await;

        let mut params = vec![
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
            ("limit", limit.to_string()),
        ];
        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        let response = self
            .client
            .get(self.search_url.clone())
            .query(&params)
            .header(header::ACCEPT_LANGUAGE, language)
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                GeocodingError::ParseError(e.to_string())
            }
        })?;

        let total = places.len();
        let suggestions: Vec<PlaceSuggestion> = places
            .into_iter()
            .filter_map(NominatimPlace::into_suggestion)
            .take(usize::from(limit))
            .collect();
        if suggestions.len() < total.min(usize::from(limit)) {
            warn!(
                total,
                kept = suggestions.len(),
                "Dropped places with unparseable coordinates"
            );
        }
        Ok(suggestions)
    }

    fn map_transport_error(&self, e: &reqwest::Error) -> GeocodingError {
        if e.is_timeout() {
            self.timeout_error()
        } else {
            GeocodingError::ConnectionFailed(e.to_string())
        }
    }

    const fn timeout_error(&self) -> GeocodingError {
        GeocodingError::Timeout {
            timeout_secs: self.config.timeout_secs,
        }
    }
}

#[async_trait]
impl PlaceSearchClient for NominatimClient {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        limit: u8,
        language: &str,
    ) -> Result<Vec<PlaceSuggestion>, GeocodingError> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let key: CacheKey = (query.to_lowercase(), limit, language.to_lowercase());
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                debug!(count = hit.len(), "Place search cache hit");
                return Ok(hit);
            }
        }

        let suggestions = self.fetch(query, limit, language).await?;
        debug!(count = suggestions.len(), "Place search completed");

        if let Some(cache) = &self.cache {
            cache.insert(key, suggestions.clone()).await;
        }
        Ok(suggestions)
    }
}
