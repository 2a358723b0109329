//! Adapters implementing application ports
//!
//! Each adapter wraps an integration client and translates its errors into
//! [`application::ApplicationError`].

mod auth_adapter;
mod error_mapping;
mod geocoding_adapter;
mod trip_adapter;

pub use auth_adapter::BackendAuthAdapter;
pub use error_mapping::{map_backend_error, map_geocoding_error};
pub use geocoding_adapter::NominatimGeocodingAdapter;
pub use trip_adapter::BackendTripAdapter;
