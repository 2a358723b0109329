//! Domain entities - Objects with identity and lifecycle

mod new_trip;
mod place_suggestion;
mod reservation;
mod trip;
mod user_profile;

pub use new_trip::{MAX_OFFERED_PLACES, NewTrip};
pub use place_suggestion::PlaceSuggestion;
pub use reservation::{ReservationConfirmation, ReservationRequest};
pub use trip::Trip;
pub use user_profile::UserProfile;
