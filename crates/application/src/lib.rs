//! Application layer - Use cases and orchestration
//!
//! Contains the trip discovery and reservation services and the port
//! definitions they depend on. Adapters in the infrastructure layer implement
//! the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
