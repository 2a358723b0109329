//! Place search integration for Drive2U
//!
//! Free-text place lookups against a [Nominatim](https://nominatim.org)
//! compatible `/search` endpoint, used to suggest trip origins and
//! destinations.
//!
//! [`PlaceSearchClient`] is the client interface, implemented by
//! [`NominatimClient`]. Results are cached per query and language, and
//! requests are spaced to honour the public instance's usage policy.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{NominatimClient, NominatimConfig, PlaceSearchClient};
//!
//! let client = NominatimClient::new(&NominatimConfig::default())?;
//! let places = client.search("Portal Norte", 5, "es").await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{NominatimClient, PlaceSearchClient};
pub use config::NominatimConfig;
pub use error::GeocodingError;
