//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod trip_id;

pub use geo_location::GeoLocation;
pub use trip_id::TripId;
