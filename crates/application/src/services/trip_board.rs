//! Trip board
//!
//! Composition root of the passenger screen. Filter inputs feed the
//! [`TripStore`] derivation, the origin and destination inputs each drive a
//! [`GeocodeSuggestion`], the derived list is rendered as list items and map
//! markers, and every visible trip can open a [`ReservationFlow`].

use std::collections::HashMap;
use std::sync::Arc;

use domain::{DomainError, GeoLocation, NewTrip, PlaceSuggestion, Trip, TripId, parse_cupos};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{
    GeocodingPort, MapRendererPort, MapView, MarkerDescriptor, MarkerIcon, Notification,
    NotificationPort, TripPort,
};
use crate::services::geocode_suggestion::{GeocodeSuggestion, SuggestionConfig, SuggestionOutcome};
use crate::services::reservation_flow::{ReservationFlow, SubmitOutcome};
use crate::services::session::Session;
use crate::services::trip_store::TripStore;

/// Map defaults for the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Latitude of the default map centre
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,

    /// Longitude of the default map centre
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,

    /// Zoom level of the default view
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Zoom level after picking a suggested place
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: u8,
}

fn default_center_latitude() -> f64 {
    GeoLocation::bogota().latitude()
}

fn default_center_longitude() -> f64 {
    GeoLocation::bogota().longitude()
}

const fn default_zoom() -> u8 {
    12
}

const fn default_focus_zoom() -> u8 {
    14
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            zoom: default_zoom(),
            focus_zoom: default_focus_zoom(),
        }
    }
}

impl BoardConfig {
    /// Default map centre
    pub fn center(&self) -> Result<GeoLocation, DomainError> {
        GeoLocation::new(self.center_latitude, self.center_longitude)
    }
}

/// One row of the trip list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripListItem {
    /// Trip identifier
    pub trip_id: TripId,
    /// "origin → destination"
    pub title: String,
    /// Departure time as published
    pub departure: String,
    /// Free seats
    pub seats: u32,
    /// Formatted fare
    pub price: String,
    /// Whether a reservation can be started
    pub reservable: bool,
}

impl TripListItem {
    fn from_trip(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id.clone(),
            title: format!("{} → {}", trip.start_location, trip.end_trip),
            departure: trip.time_trip.clone(),
            seats: trip.available_places,
            price: format_price(trip.price_trip),
            reservable: !trip.is_full(),
        }
    }
}

/// Everything the board shows: the list and the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    /// Filtered trips, in backend order
    pub items: Vec<TripListItem>,
    /// Map centre, zoom and markers
    pub map: MapView,
}

/// Collaborators the board talks to
pub struct BoardPorts {
    /// Backend trip API
    pub trips: Arc<dyn TripPort>,
    /// Place search
    pub geocoder: Arc<dyn GeocodingPort>,
    /// Map engine
    pub map: Arc<dyn MapRendererPort>,
    /// User notifications
    pub notifier: Arc<dyn NotificationPort>,
}

impl std::fmt::Debug for BoardPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardPorts").finish_non_exhaustive()
    }
}

/// Passenger trip board
pub struct TripBoard {
    session: Arc<Session>,
    store: Arc<TripStore>,
    trips: Arc<dyn TripPort>,
    map: Arc<dyn MapRendererPort>,
    notifier: Arc<dyn NotificationPort>,
    salida: GeocodeSuggestion,
    llegada: GeocodeSuggestion,
    config: BoardConfig,
    focus: RwLock<Option<PlaceSuggestion>>,
    flows: Mutex<HashMap<TripId, Arc<ReservationFlow>>>,
}

impl std::fmt::Debug for TripBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripBoard")
            .field("session", &self.session)
            .field("store", &self.store)
            .field("config", &self.config)
            .field("flows", &self.flows.lock().len())
            .finish_non_exhaustive()
    }
}

impl TripBoard {
    /// Build a board for `session`
    #[must_use]
    pub fn new(
        session: Arc<Session>,
        ports: BoardPorts,
        config: BoardConfig,
        suggestions: SuggestionConfig,
    ) -> Self {
        let store = Arc::new(TripStore::new(
            Arc::clone(&ports.trips),
            Arc::clone(&session),
        ));
        Self {
            session,
            store,
            trips: ports.trips,
            map: ports.map,
            notifier: ports.notifier,
            salida: GeocodeSuggestion::new(Arc::clone(&ports.geocoder), suggestions.clone()),
            llegada: GeocodeSuggestion::new(ports.geocoder, suggestions),
            config,
            focus: RwLock::new(None),
            flows: Mutex::new(HashMap::new()),
        }
    }

    /// Underlying trip store
    pub fn store(&self) -> &Arc<TripStore> {
        &self.store
    }

    /// Load trips (once per session) and draw the board
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<BoardView, ApplicationError> {
        if let Err(e) = self.store.ensure_loaded().await {
            self.notify_failure(&e);
            return Err(e);
        }
        Ok(self.render())
    }

    /// Fetch trips again and redraw
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<BoardView, ApplicationError> {
        if let Err(e) = self.store.reload().await {
            self.notify_failure(&e);
            return Err(e);
        }
        Ok(self.render())
    }

    /// Seat filter input changed
    ///
    /// A value that is not a whole number leaves the previous filter in
    /// place and is reported as a validation error.
    pub fn set_cupos(&self, raw: &str) -> Result<BoardView, ApplicationError> {
        let cupos = parse_cupos(raw)?;
        self.store.update_criteria(|c| c.cupos = cupos);
        Ok(self.render())
    }

    /// Origin input changed: filter right away, then look up suggestions
    pub async fn salida_input(&self, text: &str) -> SuggestionOutcome {
        self.store
            .update_criteria(|c| *c = c.clone().with_salida(text));
        self.render();
        self.salida.input(text).await
    }

    /// Destination input changed: filter right away, then look up suggestions
    pub async fn llegada_input(&self, text: &str) -> SuggestionOutcome {
        self.store
            .update_criteria(|c| *c = c.clone().with_llegada(text));
        self.render();
        self.llegada.input(text).await
    }

    /// Pick an origin suggestion
    ///
    /// The filter takes the place's short name and the map centres on it.
    pub fn select_salida(&self, index: usize) -> Option<PlaceSuggestion> {
        let place = self.salida.select(index)?;
        self.store
            .update_criteria(|c| *c = c.clone().with_salida(place.short_name()));
        self.focus_on(place.clone());
        Some(place)
    }

    /// Pick a destination suggestion
    pub fn select_llegada(&self, index: usize) -> Option<PlaceSuggestion> {
        let place = self.llegada.select(index)?;
        self.store
            .update_criteria(|c| *c = c.clone().with_llegada(place.short_name()));
        self.focus_on(place.clone());
        Some(place)
    }

    /// Origin input lost focus
    pub fn blur_salida(&self) {
        self.salida.blur();
    }

    /// Destination input lost focus
    pub fn blur_llegada(&self) {
        self.llegada.blur();
    }

    /// Current origin suggestions
    pub fn salida_suggestions(&self) -> Vec<PlaceSuggestion> {
        self.salida.suggestions()
    }

    /// Current destination suggestions
    pub fn llegada_suggestions(&self) -> Vec<PlaceSuggestion> {
        self.llegada.suggestions()
    }

    /// Forget the picked place and return to the default view
    pub fn reset_focus(&self) -> BoardView {
        *self.focus.write() = None;
        self.render()
    }

    /// Derive the board from the store without drawing it
    pub fn view(&self) -> BoardView {
        let visible = self.store.visible();
        let items = visible.iter().map(TripListItem::from_trip).collect();

        let mut markers: Vec<MarkerDescriptor> = visible.iter().flat_map(trip_markers).collect();

        let focus = self.focus.read().clone();
        let (center, zoom) = match focus {
            Some(place) => {
                markers.push(MarkerDescriptor {
                    position: place.location,
                    icon: MarkerIcon::SelectedPlace,
                    popup: place.display_name.clone(),
                    trip_id: None,
                });
                (place.location, self.config.focus_zoom)
            },
            None => (self.default_center(), self.config.zoom),
        };

        BoardView {
            items,
            map: MapView {
                center,
                zoom,
                markers,
            },
        }
    }

    /// Derive the board and hand the map to the renderer
    pub fn render(&self) -> BoardView {
        let view = self.view();
        debug!(
            items = view.items.len(),
            markers = view.map.markers.len(),
            "Rendering board"
        );
        self.map.render(&view.map);
        view
    }

    /// Open the reservation dialog for a visible trip
    ///
    /// The same flow is returned for repeated calls on the same trip.
    pub fn reserve(&self, trip_id: &TripId) -> Result<Arc<ReservationFlow>, ApplicationError> {
        if !self.store.visible().iter().any(|t| &t.id == trip_id) {
            return Err(DomainError::not_found("Trip", trip_id.as_str()).into());
        }

        let flow = {
            let mut flows = self.flows.lock();
            Arc::clone(flows.entry(trip_id.clone()).or_insert_with(|| {
                Arc::new(ReservationFlow::new(
                    trip_id.clone(),
                    Arc::clone(&self.trips),
                    Arc::clone(&self.store),
                    Arc::clone(&self.session),
                    Arc::clone(&self.notifier),
                ))
            }))
        };
        flow.open()?;
        Ok(flow)
    }

    /// Submit the open reservation for `trip_id` and redraw on success
    pub async fn submit_reservation(
        &self,
        trip_id: &TripId,
    ) -> Result<SubmitOutcome, ApplicationError> {
        let flow = self
            .flows
            .lock()
            .get(trip_id)
            .cloned()
            .ok_or_else(|| ApplicationError::InvalidState(format!("no reservation open for trip {trip_id}")))?;

        let outcome = flow.submit().await?;
        if matches!(outcome, SubmitOutcome::Confirmed(_)) {
            self.render();
        }
        Ok(outcome)
    }

    /// Publish a new trip as a driver, then reload the board
    #[instrument(skip(self, trip), fields(from = %trip.start_location, to = %trip.end_trip))]
    pub async fn publish_trip(&self, trip: &NewTrip) -> Result<TripId, ApplicationError> {
        let token = self.session.token()?;
        let trip_id = match self.trips.create_trip(&token, trip).await {
            Ok(id) => id,
            Err(e) => {
                self.notify_failure(&e);
                return Err(e);
            },
        };
        info!(trip_id = %trip_id, "Trip published");
        self.notifier
            .notify(Notification::success(format!("Trip {trip_id} published")));

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Could not reload trips after publishing");
        }
        Ok(trip_id)
    }

    fn focus_on(&self, place: PlaceSuggestion) {
        debug!(place = %place.display_name, location = %place.location, "Map focus");
        *self.focus.write() = Some(place);
        self.render();
    }

    fn default_center(&self) -> GeoLocation {
        self.config.center().unwrap_or_else(|e| {
            warn!(error = %e, "Configured map centre is invalid; using Bogotá");
            GeoLocation::bogota()
        })
    }

    fn notify_failure(&self, error: &ApplicationError) {
        if !error.is_validation() {
            self.notifier
                .notify(Notification::error(error.user_message()));
        }
    }
}

/// Popup text for a trip marker
pub fn popup_text(trip: &Trip) -> String {
    let seats = match trip.available_places {
        0 => "full".to_string(),
        1 => "1 seat".to_string(),
        n => format!("{n} seats"),
    };
    let mut text = format!(
        "{} → {}\nDeparts {} · {} · {}",
        trip.start_location,
        trip.end_trip,
        trip.time_trip,
        seats,
        format_price(trip.price_trip)
    );
    if let Some(route) = &trip.route {
        text.push_str("\nRoute: ");
        text.push_str(route);
    }
    text
}

fn trip_markers(trip: &Trip) -> Vec<MarkerDescriptor> {
    let popup = popup_text(trip);
    [
        (trip.start_location_coords, MarkerIcon::TripStart),
        (trip.end_trip_coords, MarkerIcon::TripEnd),
    ]
    .into_iter()
    .filter_map(|(coords, icon)| {
        coords.map(|position| MarkerDescriptor {
            position,
            icon,
            popup: popup.clone(),
            trip_id: Some(trip.id.clone()),
        })
    })
    .collect()
}

/// Fare with thousands separators, e.g. `$6.500`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_price(price: f64) -> String {
    let whole = price.round().max(0.0) as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    format!("${out}")
}
