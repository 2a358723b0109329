//! Domain layer for Drive2U
//!
//! Contains the trip discovery and reservation model: entities, value objects,
//! the pure trip filter and domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod filter;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use filter::{FilterCriteria, filtered, parse_cupos};
pub use value_objects::*;
