//! Reservation flow for a single trip
//!
//! ```text
//! Closed --open--> Open --submit--> Submitting --ok--> Closed
//!                   ^                    |
//!                   +-------error--------+
//! ```
//!
//! Validation happens before any request is sent and keeps the form open.
//! While a request is in flight further submits are ignored, so at most one
//! reservation request per flow is outstanding.

use std::sync::Arc;

use domain::{DomainError, ReservationConfirmation, ReservationRequest, TripId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{Notification, NotificationPort, TripPort};
use crate::services::session::Session;
use crate::services::trip_store::TripStore;

/// Form contents while the reservation dialog is open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    /// Seats the passenger asks for; checked on submit, not clamped
    pub requested_places: u32,
    /// Pickup/drop points as typed, in order
    pub points: Vec<String>,
}

impl Default for ReservationDraft {
    fn default() -> Self {
        Self {
            requested_places: 1,
            points: vec![String::new()],
        }
    }
}

/// Observable phase of the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    /// Dialog not shown
    Closed,
    /// Dialog shown and editable
    Open,
    /// Request in flight
    Submitting,
}

#[derive(Debug)]
enum FlowState {
    Closed,
    Open(ReservationDraft),
    Submitting(ReservationDraft),
}

/// Result of a submit that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the reservation
    Confirmed(ReservationConfirmation),
    /// Another submission was already in flight
    Ignored,
}

/// Reservation dialog state machine for one trip
pub struct ReservationFlow {
    trip_id: TripId,
    trips: Arc<dyn TripPort>,
    store: Arc<TripStore>,
    session: Arc<Session>,
    notifier: Arc<dyn NotificationPort>,
    state: Mutex<FlowState>,
}

impl std::fmt::Debug for ReservationFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationFlow")
            .field("trip_id", &self.trip_id)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl ReservationFlow {
    /// Create a closed flow for `trip_id`
    #[must_use]
    pub fn new(
        trip_id: TripId,
        trips: Arc<dyn TripPort>,
        store: Arc<TripStore>,
        session: Arc<Session>,
        notifier: Arc<dyn NotificationPort>,
    ) -> Self {
        Self {
            trip_id,
            trips,
            store,
            session,
            notifier,
            state: Mutex::new(FlowState::Closed),
        }
    }

    /// Trip this flow reserves on
    pub const fn trip_id(&self) -> &TripId {
        &self.trip_id
    }

    /// Current phase
    pub fn phase(&self) -> FlowPhase {
        match *self.state.lock() {
            FlowState::Closed => FlowPhase::Closed,
            FlowState::Open(_) => FlowPhase::Open,
            FlowState::Submitting(_) => FlowPhase::Submitting,
        }
    }

    /// Current form contents, if the dialog is open or submitting
    pub fn draft(&self) -> Option<ReservationDraft> {
        match &*self.state.lock() {
            FlowState::Closed => None,
            FlowState::Open(draft) | FlowState::Submitting(draft) => Some(draft.clone()),
        }
    }

    /// Open the dialog with one seat and a single empty point
    ///
    /// Opening an already open dialog keeps its contents.
    pub fn open(&self) -> Result<ReservationDraft, ApplicationError> {
        if self.store.trip(&self.trip_id).is_none() {
            return Err(DomainError::not_found("Trip", self.trip_id.as_str()).into());
        }

        let mut state = self.state.lock();
        match &*state {
            FlowState::Closed => {
                let draft = ReservationDraft::default();
                *state = FlowState::Open(draft.clone());
                debug!(trip_id = %self.trip_id, "Reservation dialog opened");
                Ok(draft)
            },
            FlowState::Open(draft) => Ok(draft.clone()),
            FlowState::Submitting(_) => Err(submitting()),
        }
    }

    /// Close the dialog, discarding its contents
    ///
    /// Returns `false` if there was nothing to close or a request is in
    /// flight.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock();
        if matches!(*state, FlowState::Open(_)) {
            *state = FlowState::Closed;
            debug!(trip_id = %self.trip_id, "Reservation dialog cancelled");
            true
        } else {
            false
        }
    }

    /// Change the requested seat count
    pub fn set_requested_places(&self, requested_places: u32) -> Result<(), ApplicationError> {
        self.edit(|draft| {
            draft.requested_places = requested_places;
            Ok(())
        })
    }

    /// Append an empty pickup/drop point
    ///
    /// No point is added once there is one per requested seat; returns
    /// whether a point was added.
    pub fn add_point(&self) -> Result<bool, ApplicationError> {
        self.edit(|draft| {
            let cap = draft.requested_places.max(1) as usize;
            if draft.points.len() >= cap {
                return Ok(false);
            }
            draft.points.push(String::new());
            Ok(true)
        })
    }

    /// Replace the text of the point at `index`
    pub fn set_point(&self, index: usize, text: &str) -> Result<(), ApplicationError> {
        self.edit(|draft| {
            let point = draft
                .points
                .get_mut(index)
                .ok_or_else(|| no_point_at(index))?;
            text.clone_into(point);
            Ok(())
        })
    }

    /// Remove the point at `index`
    ///
    /// The last remaining point is never removed; returns whether a point
    /// was removed.
    pub fn remove_point(&self, index: usize) -> Result<bool, ApplicationError> {
        self.edit(|draft| {
            if index >= draft.points.len() {
                return Err(no_point_at(index));
            }
            if draft.points.len() == 1 {
                return Ok(false);
            }
            draft.points.remove(index);
            Ok(true)
        })
    }

    /// Submit the reservation
    ///
    /// The seat count is checked against the store's current figure for the
    /// trip; an invalid form keeps the dialog open and sends nothing. On
    /// success the store is decremented once and the dialog closes; on
    /// failure the dialog reopens with the same contents.
    #[instrument(skip(self), fields(trip_id = %self.trip_id))]
    pub async fn submit(&self) -> Result<SubmitOutcome, ApplicationError> {
        let (request, token) = {
            let mut state = self.state.lock();
            let draft = match &*state {
                FlowState::Closed => {
                    return Err(ApplicationError::InvalidState(
                        "reservation dialog is not open".to_string(),
                    ));
                },
                FlowState::Submitting(_) => {
                    debug!("Submit ignored; request already in flight");
                    return Ok(SubmitOutcome::Ignored);
                },
                FlowState::Open(draft) => draft.clone(),
            };

            let available = self
                .store
                .trip(&self.trip_id)
                .ok_or_else(|| DomainError::not_found("Trip", self.trip_id.as_str()))?
                .available_places;
            let request = ReservationRequest::new(draft.requested_places, &draft.points, available)?;
            let token = self.session.token()?;

            *state = FlowState::Submitting(draft);
            (request, token)
        };

        let in_flight = InFlight::new(&self.state);
        let result = self.trips.reserve(&token, &self.trip_id, &request).await;
        in_flight.disarm();

        match result {
            Ok(confirmation) => {
                *self.state.lock() = FlowState::Closed;
                let seats = request.requested_places();
                match self.store.apply_reservation(&self.trip_id, seats) {
                    Ok(trip) => info!(
                        reservation_id = %confirmation.reservation_id,
                        seats,
                        remaining = trip.available_places,
                        "Reservation confirmed"
                    ),
                    Err(e) => warn!(
                        error = %e,
                        reservation_id = %confirmation.reservation_id,
                        "Reservation confirmed for a trip no longer cached"
                    ),
                }
                self.notifier.notify(Notification::success(confirmed_message(seats)));
                Ok(SubmitOutcome::Confirmed(confirmation))
            },
            Err(e) => {
                reopen(&mut self.state.lock());
                warn!(error = %e, "Reservation failed");
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            },
        }
    }

    fn edit<T>(
        &self,
        change: impl FnOnce(&mut ReservationDraft) -> Result<T, ApplicationError>,
    ) -> Result<T, ApplicationError> {
        let mut state = self.state.lock();
        match &mut *state {
            FlowState::Open(draft) => change(draft),
            FlowState::Submitting(_) => Err(submitting()),
            FlowState::Closed => Err(ApplicationError::InvalidState(
                "reservation dialog is not open".to_string(),
            )),
        }
    }
}

/// Puts a submitting flow back to `Open` if the request future is dropped
/// before it completes
struct InFlight<'a> {
    state: &'a Mutex<FlowState>,
    armed: bool,
}

impl<'a> InFlight<'a> {
    const fn new(state: &'a Mutex<FlowState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("Reservation request abandoned; reopening the dialog");
            reopen(&mut self.state.lock());
        }
    }
}

fn reopen(state: &mut FlowState) {
    let previous = std::mem::replace(state, FlowState::Closed);
    *state = match previous {
        FlowState::Submitting(draft) | FlowState::Open(draft) => FlowState::Open(draft),
        FlowState::Closed => FlowState::Closed,
    };
}

fn submitting() -> ApplicationError {
    ApplicationError::InvalidState("reservation is being submitted".to_string())
}

fn no_point_at(index: usize) -> ApplicationError {
    DomainError::validation(format!("no pickup/drop point at position {}", index + 1)).into()
}

fn confirmed_message(seats: u32) -> String {
    if seats == 1 {
        "Reservation confirmed: 1 seat".to_string()
    } else {
        format!("Reservation confirmed: {seats} seats")
    }
}
