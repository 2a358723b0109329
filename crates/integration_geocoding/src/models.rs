//! Nominatim wire format

use domain::{GeoLocation, PlaceSuggestion};
use serde::Deserialize;

/// One entry of a `/search?format=json` response
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    #[serde(default)]
    pub place_id: Option<u64>,
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

impl NominatimPlace {
    /// Convert to a suggestion; `None` if the coordinates do not parse
    pub(crate) fn into_suggestion(self) -> Option<PlaceSuggestion> {
        let location = GeoLocation::parse(&self.lat, &self.lon).ok()?;
        let suggestion = PlaceSuggestion::new(self.display_name, location);
        Some(match self.place_id {
            Some(id) => suggestion.with_place_id(id),
            None => suggestion,
        })
    }
}
