//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod auth_port;
mod geocoding_port;
mod map_port;
mod notification_port;
mod trip_port;

#[cfg(test)]
pub use auth_port::MockAuthPort;
pub use auth_port::AuthPort;
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
pub use map_port::{MapRendererPort, MapView, MarkerDescriptor, MarkerIcon};
pub use notification_port::{Notification, NotificationLevel, NotificationPort};
#[cfg(test)]
pub use trip_port::MockTripPort;
pub use trip_port::TripPort;
