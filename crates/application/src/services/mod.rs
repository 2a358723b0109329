//! Application services - Use case implementations

mod geocode_suggestion;
mod reservation_flow;
mod session;
mod trip_board;
mod trip_store;

pub use geocode_suggestion::{GeocodeSuggestion, SuggestionConfig, SuggestionOutcome};
pub use reservation_flow::{FlowPhase, ReservationDraft, ReservationFlow, SubmitOutcome};
pub use session::{AuthService, Session};
pub use trip_board::{BoardConfig, BoardPorts, BoardView, TripBoard, TripListItem, popup_text};
pub use trip_store::TripStore;
