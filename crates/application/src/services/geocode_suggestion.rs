//! Debounced place suggestions for a single text input
//!
//! Every call to [`GeocodeSuggestion::input`] takes a new generation token.
//! The lookup only runs if no newer input arrived during the quiescence
//! window, and its result is only applied if the token is still current when
//! it completes. Selection and blur also advance the generation, so results
//! still in flight at that point are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domain::PlaceSuggestion;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::ports::GeocodingPort;

/// Tuning for suggestion lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Quiescence window before a lookup is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shorter queries (in characters) clear the list instead
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Maximum number of suggestions requested
    #[serde(default = "default_max_results")]
    pub max_results: u8,

    /// Preferred result language (`Accept-Language`)
    #[serde(default = "default_language")]
    pub language: String,

    /// Client-side bound on a single lookup
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

const fn default_debounce_ms() -> u64 {
    300
}

const fn default_min_query_chars() -> usize {
    3
}

const fn default_max_results() -> u8 {
    5
}

fn default_language() -> String {
    "es".to_string()
}

const fn default_lookup_timeout_ms() -> u64 {
    8_000
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            max_results: default_max_results(),
            language: default_language(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl SuggestionConfig {
    /// Quiescence window as a duration
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Lookup timeout as a duration
    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

/// What happened to a single input event
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    /// Query too short; the list was cleared and nothing was looked up
    Cleared,
    /// A newer input arrived during the quiescence window; no lookup
    Superseded,
    /// The lookup result became the current list
    Applied(Vec<PlaceSuggestion>),
    /// The lookup finished after a newer input, selection or blur
    Stale,
    /// The lookup failed or timed out; the list was cleared
    Failed,
}

/// Suggestion list bound to one text input
pub struct GeocodeSuggestion {
    geocoder: Arc<dyn GeocodingPort>,
    config: SuggestionConfig,
    generation: AtomicU64,
    suggestions: Mutex<Vec<PlaceSuggestion>>,
}

impl std::fmt::Debug for GeocodeSuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeSuggestion")
            .field("config", &self.config)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("suggestions", &self.suggestions.lock().len())
            .finish_non_exhaustive()
    }
}

impl GeocodeSuggestion {
    /// Create an empty suggestion list
    #[must_use]
    pub fn new(geocoder: Arc<dyn GeocodingPort>, config: SuggestionConfig) -> Self {
        Self {
            geocoder,
            config,
            generation: AtomicU64::new(0),
            suggestions: Mutex::new(Vec::new()),
        }
    }

    /// Handle a change of the input text
    ///
    /// Resolves once the event is settled: immediately for short queries,
    /// after the quiescence window if superseded, or when the lookup ends.
    #[instrument(skip(self), fields(generation))]
    pub async fn input(&self, query: &str) -> SuggestionOutcome {
        let token = self.next_generation();
        tracing::Span::current().record("generation", token);

        let query = query.trim();
        if query.chars().count() < self.config.min_query_chars {
            let mut list = self.suggestions.lock();
            if self.is_current(token) {
                list.clear();
            }
            return SuggestionOutcome::Cleared;
        }

        tokio::time::sleep(self.config.debounce()).await;
        if !self.is_current(token) {
            debug!("Superseded during quiescence window");
            return SuggestionOutcome::Superseded;
        }

        let lookup = self.geocoder.search(
            query,
            self.config.max_results,
            &self.config.language,
        );
        let result = tokio::time::timeout(self.config.lookup_timeout(), lookup).await;

        let mut list = self.suggestions.lock();
        if !self.is_current(token) {
            debug!("Discarding stale lookup result");
            return SuggestionOutcome::Stale;
        }

        match result {
            Ok(Ok(mut found)) => {
                found.truncate(usize::from(self.config.max_results));
                debug!(count = found.len(), "Applying suggestions");
                list.clone_from(&found);
                SuggestionOutcome::Applied(found)
            },
            Ok(Err(e)) => {
                warn!(error = %e, "Place lookup failed");
                list.clear();
                SuggestionOutcome::Failed
            },
            Err(_) => {
                warn!(
                    timeout_ms = self.config.lookup_timeout_ms,
                    "Place lookup timed out"
                );
                list.clear();
                SuggestionOutcome::Failed
            },
        }
    }

    /// Pick the suggestion at `index`, clearing the list
    ///
    /// Returns `None` if there is no such suggestion; the list is left as is.
    pub fn select(&self, index: usize) -> Option<PlaceSuggestion> {
        let mut list = self.suggestions.lock();
        if index >= list.len() {
            return None;
        }
        self.next_generation();
        let chosen = list.swap_remove(index);
        list.clear();
        debug!(place = %chosen.display_name, "Suggestion selected");
        Some(chosen)
    }

    /// The input lost focus: drop the list and anything in flight
    pub fn blur(&self) {
        let mut list = self.suggestions.lock();
        self.next_generation();
        list.clear();
    }

    /// Current suggestion list
    pub fn suggestions(&self) -> Vec<PlaceSuggestion> {
        self.suggestions.lock().clone()
    }

    /// Lookup settings
    pub const fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use domain::GeoLocation;

    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::MockGeocodingPort;

    fn place(name: &str) -> PlaceSuggestion {
        PlaceSuggestion::new(name, GeoLocation::bogota())
    }

    /// Geocoder whose lookups take a per-query amount of (virtual) time
    #[derive(Default)]
    struct SlowGeocoder {
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl SlowGeocoder {
        fn with_delay(mut self, query: &str, delay: Duration) -> Self {
            self.delays.insert(query.to_string(), delay);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl GeocodingPort for SlowGeocoder {
        async fn search(
            &self,
            query: &str,
            _limit: u8,
            _language: &str,
        ) -> Result<Vec<PlaceSuggestion>, ApplicationError> {
            self.calls.lock().push(query.to_string());
            let delay = self.delays.get(query).copied().unwrap_or_default();
            tokio::time::sleep(delay).await;
            Ok(vec![place(&format!("{query}, Colombia"))])
        }
    }

    #[test]
    fn default_config() {
        let config = SuggestionConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.min_query_chars, 3);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.language, "es");
        assert_eq!(config.lookup_timeout(), Duration::from_secs(8));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SuggestionConfig = serde_json::from_str(r#"{"language": "en"}"#).unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.debounce_ms, 300);
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_never_looks_up() {
        let geocoder = MockGeocodingPort::new();
        let suggestions = GeocodeSuggestion::new(Arc::new(geocoder), SuggestionConfig::default());

        assert_eq!(suggestions.input("Bo").await, SuggestionOutcome::Cleared);
        assert_eq!(suggestions.input("  ").await, SuggestionOutcome::Cleared);
        assert!(suggestions.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn length_is_counted_in_characters() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_search()
            .withf(|q, limit, lang| q == "Chí" && *limit == 5 && lang == "es")
            .times(1)
            .returning(|_, _, _| Ok(vec![place("Chía, Cundinamarca")]));
        let suggestions = GeocodeSuggestion::new(Arc::new(geocoder), SuggestionConfig::default());

        // three characters, four bytes
        let outcome = suggestions.input("Chí").await;
        assert!(matches!(outcome, SuggestionOutcome::Applied(ref list) if list.len() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_clears_existing_list() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_search()
            .returning(|_, _, _| Ok(vec![place("Bogotá"), place("Boyacá")]));
        let suggestions = GeocodeSuggestion::new(Arc::new(geocoder), SuggestionConfig::default());

        suggestions.input("Boy").await;
        assert_eq!(suggestions.suggestions().len(), 2);

        assert_eq!(suggestions.input("B").await, SuggestionOutcome::Cleared);
        assert!(suggestions.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_within_window_issues_one_lookup() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_search()
            .withf(|q, _, _| q == "Bogo")
            .times(1)
            .returning(|_, _, _| Ok(vec![place("Bogotá, Colombia")]));
        let suggestions = Arc::new(GeocodeSuggestion::new(
            Arc::new(geocoder),
            SuggestionConfig::default(),
        ));

        let first = tokio::spawn({
            let suggestions = Arc::clone(&suggestions);
            async move { suggestions.input("Bog").await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = suggestions.input("Bogo").await;

        assert_eq!(first.await.unwrap(), SuggestionOutcome::Superseded);
        assert!(matches!(second, SuggestionOutcome::Applied(_)));
        assert_eq!(suggestions.suggestions()[0].display_name, "Bogotá, Colombia");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_result_for_old_query_is_discarded() {
        let geocoder = Arc::new(
            SlowGeocoder::default()
                .with_delay("Bogotá", Duration::from_secs(1))
                .with_delay("Chía", Duration::from_millis(10)),
        );
        let suggestions = Arc::new(GeocodeSuggestion::new(
            Arc::clone(&geocoder) as Arc<dyn GeocodingPort>,
            SuggestionConfig::default(),
        ));

        let first = tokio::spawn({
            let suggestions = Arc::clone(&suggestions);
            async move { suggestions.input("Bogotá").await }
        });
        // first lookup starts at 300ms and finishes at 1300ms
        tokio::time::sleep(Duration::from_millis(500)).await;
        let second = suggestions.input("Chía").await;

        assert!(matches!(second, SuggestionOutcome::Applied(_)));
        assert_eq!(first.await.unwrap(), SuggestionOutcome::Stale);
        assert_eq!(geocoder.calls(), ["Bogotá", "Chía"]);

        let list = suggestions.suggestions();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].display_name, "Chía, Colombia");
    }

    #[tokio::test(start_paused = true)]
    async fn blur_discards_in_flight_result() {
        let geocoder =
            Arc::new(SlowGeocoder::default().with_delay("Cajicá", Duration::from_secs(1)));
        let suggestions = Arc::new(GeocodeSuggestion::new(
            geocoder as Arc<dyn GeocodingPort>,
            SuggestionConfig::default(),
        ));

        let pending = tokio::spawn({
            let suggestions = Arc::clone(&suggestions);
            async move { suggestions.input("Cajicá").await }
        });
        tokio::time::sleep(Duration::from_millis(500)).await;
        suggestions.blur();

        assert_eq!(pending.await.unwrap(), SuggestionOutcome::Stale);
        assert!(suggestions.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_leaves_list_empty() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_search()
            .returning(|_, _, _| Err(ApplicationError::ExternalService("HTTP 503".into())));
        let suggestions = GeocodeSuggestion::new(Arc::new(geocoder), SuggestionConfig::default());

        assert_eq!(suggestions.input("Suba").await, SuggestionOutcome::Failed);
        assert!(suggestions.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_timeout_is_a_failure() {
        let geocoder =
            Arc::new(SlowGeocoder::default().with_delay("Zipaquirá", Duration::from_secs(60)));
        let suggestions = GeocodeSuggestion::new(geocoder, SuggestionConfig::default());

        assert_eq!(suggestions.input("Zipaquirá").await, SuggestionOutcome::Failed);
        assert!(suggestions.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn select_returns_place_and_clears() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder.expect_search().returning(|_, _, _| {
            Ok(vec![
                place("Portal Norte, Bogotá"),
                place("Portal 80, Bogotá"),
            ])
        });
        let suggestions = GeocodeSuggestion::new(Arc::new(geocoder), SuggestionConfig::default());
        suggestions.input("Portal").await;

        assert!(suggestions.select(5).is_none());
        assert_eq!(suggestions.suggestions().len(), 2);

        let chosen = suggestions.select(1).unwrap();
        assert_eq!(chosen.display_name, "Portal 80, Bogotá");
        assert!(suggestions.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn results_are_capped() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder.expect_search().returning(|_, _, _| {
            Ok((0..8).map(|i| place(&format!("Calle {i}"))).collect())
        });
        let suggestions = GeocodeSuggestion::new(Arc::new(geocoder), SuggestionConfig::default());

        suggestions.input("Calle").await;
        assert_eq!(suggestions.suggestions().len(), 5);
    }
}
