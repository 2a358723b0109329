//! Trip store
//!
//! Caches the trip collection for the session and derives the filtered list
//! shown to the passenger. The only local mutation is
//! [`TripStore::apply_reservation`], applied once per confirmed reservation.

use std::sync::Arc;

use domain::{DomainError, FilterCriteria, Trip, TripId, filtered};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::TripPort;
use crate::services::session::Session;

#[derive(Debug, Default)]
struct TripStoreState {
    trips: Vec<Trip>,
    loaded: bool,
    criteria: FilterCriteria,
}

/// Session-scoped cache of trips plus the active filter
pub struct TripStore {
    trips_port: Arc<dyn TripPort>,
    session: Arc<Session>,
    state: RwLock<TripStoreState>,
    load_lock: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for TripStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("TripStore")
            .field("trips", &state.trips.len())
            .field("loaded", &state.loaded)
            .field("criteria", &state.criteria)
            .finish_non_exhaustive()
    }
}

impl TripStore {
    /// Create an empty store for `session`
    #[must_use]
    pub fn new(trips_port: Arc<dyn TripPort>, session: Arc<Session>) -> Self {
        Self {
            trips_port,
            session,
            state: RwLock::new(TripStoreState::default()),
            load_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Load the trip collection unless it was already loaded this session
    ///
    /// Concurrent callers share a single fetch. Returns the number of cached
    /// trips.
    #[instrument(skip(self))]
    pub async fn ensure_loaded(&self) -> Result<usize, ApplicationError> {
        let _guard = self.load_lock.lock().await;
        {
            let state = self.state.read();
            if state.loaded {
                return Ok(state.trips.len());
            }
        }
        self.fetch().await
    }

    /// Fetch the trip collection again, replacing the cache
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<usize, ApplicationError> {
        let _guard = self.load_lock.lock().await;
        self.fetch().await
    }

    async fn fetch(&self) -> Result<usize, ApplicationError> {
        let token = self.session.token()?;
        let trips = self.trips_port.list_trips(&token).await?;
        let count = trips.len();

        let mut state = self.state.write();
        state.trips = trips;
        state.loaded = true;
        info!(count, "Trips loaded");
        Ok(count)
    }

    /// Whether the collection has been loaded
    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    /// All cached trips in backend order
    pub fn trips(&self) -> Vec<Trip> {
        self.state.read().trips.clone()
    }

    /// A single cached trip
    pub fn trip(&self, trip_id: &TripId) -> Option<Trip> {
        self.state
            .read()
            .trips
            .iter()
            .find(|t| &t.id == trip_id)
            .cloned()
    }

    /// Active filter criteria
    pub fn criteria(&self) -> FilterCriteria {
        self.state.read().criteria.clone()
    }

    /// Replace the filter criteria
    pub fn set_criteria(&self, criteria: FilterCriteria) {
        debug!(?criteria, "Filter criteria changed");
        self.state.write().criteria = criteria;
    }

    /// Update the filter criteria in place
    pub fn update_criteria(&self, update: impl FnOnce(&mut FilterCriteria)) {
        let mut state = self.state.write();
        update(&mut state.criteria);
        debug!(criteria = ?state.criteria, "Filter criteria changed");
    }

    /// Trips passing the active criteria, in backend order
    pub fn visible(&self) -> Vec<Trip> {
        let state = self.state.read();
        filtered(&state.trips, &state.criteria)
    }

    /// Record a confirmed reservation of `seats_taken` seats on `trip_id`
    ///
    /// Before: the trip is cached with `p` free seats. After: it has
    /// `p - seats_taken` free seats. If the cache already held fewer seats
    /// than were confirmed, the count saturates at zero.
    ///
    /// Returns the updated trip.
    pub fn apply_reservation(
        &self,
        trip_id: &TripId,
        seats_taken: u32,
    ) -> Result<Trip, ApplicationError> {
        let mut state = self.state.write();
        let trip = state
            .trips
            .iter_mut()
            .find(|t| &t.id == trip_id)
            .ok_or_else(|| DomainError::not_found("Trip", trip_id.as_str()))?;

        let before = trip.available_places;
        let shortfall = trip.take_seats(seats_taken);
        if shortfall > 0 {
            warn!(
                trip_id = %trip_id,
                before,
                seats_taken,
                "Cached seat count was behind the server; clamped to zero"
            );
        }
        debug!(
            trip_id = %trip_id,
            before,
            after = trip.available_places,
            "Applied reservation"
        );
        Ok(trip.clone())
    }
}
