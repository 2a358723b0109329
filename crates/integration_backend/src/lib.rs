//! Drive2U backend integration
//!
//! HTTP client for the Drive2U REST API: sign-in, the signed-in user's
//! profile, the trip listing, seat reservations and trip publication. Every
//! call except sign-in carries the session's bearer token.
//!
//! [`BackendClient`] is the client interface, implemented by
//! [`HttpBackendClient`]. Wire formats live in a private module and are
//! converted to `domain` types at this boundary; numeric fields are accepted
//! both as JSON numbers and as numeric strings.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_backend::{BackendClient, BackendConfig, HttpBackendClient};
//!
//! let client = HttpBackendClient::new(&BackendConfig::default())?;
//! let token = client.login("laura@unisabana.edu.co", &password).await?;
//! let trips = client.list_trips(&token).await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{BackendClient, HttpBackendClient};
pub use config::BackendConfig;
pub use error::BackendError;
