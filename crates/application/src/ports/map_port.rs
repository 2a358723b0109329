//! Map rendering port
//!
//! The map engine is an external collaborator: the application hands it a
//! centre, a zoom level and marker descriptors, and expects nothing back.

use domain::{GeoLocation, TripId};
use serde::{Deserialize, Serialize};

/// Icon shown for a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerIcon {
    /// Origin of a trip
    TripStart,
    /// Destination of a trip
    TripEnd,
    /// Place the user picked from a suggestion
    SelectedPlace,
}

/// A single marker: position, icon and popup text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDescriptor {
    /// Marker position
    pub position: GeoLocation,
    /// Marker icon
    pub icon: MarkerIcon,
    /// Popup content
    pub popup: String,
    /// Trip the marker belongs to, if any
    pub trip_id: Option<TripId>,
}

/// Everything the map engine needs to draw the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Map centre
    pub center: GeoLocation,
    /// Zoom level
    pub zoom: u8,
    /// Markers to draw
    pub markers: Vec<MarkerDescriptor>,
}

/// Port for the map rendering collaborator
pub trait MapRendererPort: Send + Sync {
    /// Draw (or redraw) the map
    fn render(&self, view: &MapView);
}
