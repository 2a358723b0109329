//! Place suggestion entity

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoLocation;

/// A candidate place returned by a geocoding lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    /// Human-readable place name as shown to the user
    pub display_name: String,
    /// Coordinates of the place
    pub location: GeoLocation,
    /// Provider-specific identifier, if any
    pub place_id: Option<u64>,
}

impl PlaceSuggestion {
    /// Create a new suggestion
    #[must_use]
    pub fn new(display_name: impl Into<String>, location: GeoLocation) -> Self {
        Self {
            display_name: display_name.into(),
            location,
            place_id: None,
        }
    }

    /// Attach the provider's place identifier
    #[must_use]
    pub const fn with_place_id(mut self, place_id: u64) -> Self {
        self.place_id = Some(place_id);
        self
    }

    /// Leading segment of the display name ("Chía, Cundinamarca" -> "Chía")
    pub fn short_name(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .map_or("", str::trim)
    }
}
