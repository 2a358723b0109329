//! Terminal implementations of the presentation ports

use std::fmt::Write as _;

use application::ports::{
    MapRendererPort, MapView, MarkerIcon, Notification, NotificationLevel, NotificationPort,
};
use application::{BoardView, TripListItem};
use domain::PlaceSuggestion;
use parking_lot::Mutex;
use tracing::debug;

/// Prints notifications, errors to stderr
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl NotificationPort for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => println!("✅ {}", notification.message),
            NotificationLevel::Info => println!("ℹ️  {}", notification.message),
            NotificationLevel::Error => eprintln!("❌ {}", notification.message),
        }
    }
}

/// Keeps the most recent map view for optional printing
#[derive(Debug, Default)]
pub struct TerminalMap {
    last: Mutex<Option<MapView>>,
}

impl TerminalMap {
    /// Most recently rendered view
    pub fn last_view(&self) -> Option<MapView> {
        self.last.lock().clone()
    }
}

impl MapRendererPort for TerminalMap {
    fn render(&self, view: &MapView) {
        debug!(
            center = %view.center,
            zoom = view.zoom,
            markers = view.markers.len(),
            "Map rendered"
        );
        *self.last.lock() = Some(view.clone());
    }
}

/// One line per trip
pub fn format_trip_list(view: &BoardView) -> String {
    if view.items.is_empty() {
        return "No trips match the current filters.".to_string();
    }
    let mut out = String::new();
    for item in &view.items {
        let _ = writeln!(out, "{}", format_trip_line(item));
    }
    out
}

fn format_trip_line(item: &TripListItem) -> String {
    let seats = if item.reservable {
        format!("{} seat{}", item.seats, if item.seats == 1 { "" } else { "s" })
    } else {
        "full".to_string()
    };
    format!(
        "{:<26} {:>5}  {}  ({seats}, {})",
        item.trip_id.as_str(),
        item.departure,
        item.title,
        item.price
    )
}

/// Centre, zoom and markers as text
pub fn format_map(view: &MapView) -> String {
    let mut out = format!("🗺️  centre {} (zoom {})\n", view.center, view.zoom);
    for marker in &view.markers {
        let icon = match marker.icon {
            MarkerIcon::TripStart => "🟢",
            MarkerIcon::TripEnd => "🏁",
            MarkerIcon::SelectedPlace => "📍",
        };
        let _ = writeln!(
            out,
            "   {icon} {} {}",
            marker.position,
            marker.popup.replace('\n', " | ")
        );
    }
    out
}

/// Numbered suggestion list
pub fn format_suggestions(places: &[PlaceSuggestion]) -> String {
    if places.is_empty() {
        return "No places found.".to_string();
    }
    let mut out = String::new();
    for (index, place) in places.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} ({})",
            index + 1,
            place.display_name,
            place.location
        );
    }
    out
}
