//! Infrastructure layer - Adapters and cross-cutting concerns
//!
//! Implements the application ports on top of the backend and geocoding
//! clients, and provides configuration loading, logging setup and retry.

pub mod adapters;
pub mod config;
pub mod retry;
pub mod telemetry;
pub mod wiring;

pub use adapters::{BackendAuthAdapter, BackendTripAdapter, NominatimGeocodingAdapter};
pub use config::AppConfig;
pub use retry::RetryConfig;
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
pub use wiring::Adapters;
