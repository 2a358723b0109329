//! Trip filtering
//!
//! [`filtered`] is a pure, order-preserving derivation: the result is always a
//! subsequence of the input, so applying the same criteria twice yields the
//! same list.

use serde::{Deserialize, Serialize};

use crate::entities::Trip;
use crate::errors::DomainError;

/// Passenger-specified trip filter
///
/// Every criterion is optional; an absent criterion matches every trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Minimum number of free seats
    pub cupos: Option<u32>,
    /// Case-insensitive substring of the trip origin
    pub salida: Option<String>,
    /// Case-insensitive substring of the trip destination
    pub llegada: Option<String>,
}

impl FilterCriteria {
    /// Criteria that match every trip
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Build criteria from raw form inputs
    ///
    /// Blank inputs are treated as absent; other text is matched as typed,
    /// surrounding spaces included.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `cupos` is not blank and not a
    /// non-negative integer.
    pub fn from_inputs(cupos: &str, salida: &str, llegada: &str) -> Result<Self, DomainError> {
        Ok(Self {
            cupos: parse_cupos(cupos)?,
            salida: non_blank(salida),
            llegada: non_blank(llegada),
        })
    }

    /// Set the minimum seat count
    #[must_use]
    pub const fn with_cupos(mut self, cupos: u32) -> Self {
        self.cupos = Some(cupos);
        self
    }

    /// Set the origin substring; blank text clears it
    #[must_use]
    pub fn with_salida(mut self, salida: &str) -> Self {
        self.salida = non_blank(salida);
        self
    }

    /// Set the destination substring; blank text clears it
    #[must_use]
    pub fn with_llegada(mut self, llegada: &str) -> Self {
        self.llegada = non_blank(llegada);
        self
    }

    /// Whether no criterion is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cupos.is_none() && self.salida.is_none() && self.llegada.is_none()
    }

    /// Whether a single trip passes all criteria
    #[must_use]
    pub fn matches(&self, trip: &Trip) -> bool {
        self.cupos.is_none_or(|min| trip.available_places >= min)
            && self
                .salida
                .as_deref()
                .is_none_or(|needle| contains_ignore_case(&trip.start_location, needle))
            && self
                .llegada
                .as_deref()
                .is_none_or(|needle| contains_ignore_case(&trip.end_trip, needle))
    }
}

/// Return the trips that pass `criteria`, in their original order
#[must_use]
pub fn filtered(trips: &[Trip], criteria: &FilterCriteria) -> Vec<Trip> {
    trips
        .iter()
        .filter(|trip| criteria.matches(trip))
        .cloned()
        .collect()
}

/// Parse the seat input of the filter form
///
/// # Errors
///
/// Returns a validation error for anything other than blank or a
/// non-negative integer.
pub fn parse_cupos(raw: &str) -> Result<Option<u32>, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| DomainError::validation(format!("seat filter '{raw}' is not a whole number")))
}

/// Text kept verbatim unless it is blank
fn non_blank(raw: &str) -> Option<String> {
    (!raw.trim().is_empty()).then(|| raw.to_string())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::TripId;

    fn trip(id: &str, from: &str, to: &str, seats: u32) -> Trip {
        Trip::new(TripId::new(id).unwrap(), from, to, "07:00", seats, 5000.0).unwrap()
    }

    fn sample() -> Vec<Trip> {
        vec![
            trip("1", "Portal Norte", "Universidad de La Sabana", 3),
            trip("2", "Chía Centro", "Calle 100", 1),
            trip("3", "Usaquén", "Universidad de La Sabana", 0),
            trip("4", "Portal 80", "Cajicá", 4),
        ]
    }

    fn ids(trips: &[Trip]) -> Vec<&str> {
        trips.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn empty_criteria_keeps_everything() {
        let trips = sample();
        assert_eq!(filtered(&trips, &FilterCriteria::any()), trips);
    }

    #[test]
    fn cupos_is_a_minimum() {
        let trips = sample();
        let criteria = FilterCriteria::any().with_cupos(3);
        assert_eq!(ids(&filtered(&trips, &criteria)), ["1", "4"]);
    }

    #[test]
    fn salida_is_case_insensitive_substring() {
        let trips = sample();
        let criteria = FilterCriteria::any().with_salida("portal");
        assert_eq!(ids(&filtered(&trips, &criteria)), ["1", "4"]);
    }

    #[test]
    fn llegada_matches_non_ascii() {
        let trips = sample();
        let criteria = FilterCriteria::any().with_llegada("CAJICÁ");
        assert_eq!(ids(&filtered(&trips, &criteria)), ["4"]);
    }

    #[test]
    fn all_criteria_combine() {
        let trips = sample();
        let criteria = FilterCriteria::any()
            .with_cupos(1)
            .with_salida("norte")
            .with_llegada("sabana");
        assert_eq!(ids(&filtered(&trips, &criteria)), ["1"]);
    }

    #[test]
    fn order_is_preserved() {
        let trips = sample();
        let criteria = FilterCriteria::any().with_salida("o");
        assert_eq!(ids(&filtered(&trips, &criteria)), ["1", "2", "4"]);
    }

    #[test]
    fn blank_text_inputs_are_absent() {
        let criteria = FilterCriteria::from_inputs("  ", "", "   ").unwrap();
        assert!(criteria.is_empty());
    }

    #[test]
    fn text_is_matched_as_typed() {
        let trips = sample();
        let criteria = FilterCriteria::from_inputs("", "Portal ", "").unwrap();
        assert_eq!(criteria.salida.as_deref(), Some("Portal "));
        assert_eq!(ids(&filtered(&trips, &criteria)), ["1", "4"]);

        let criteria = FilterCriteria::any().with_llegada(" Cajicá");
        assert!(filtered(&trips, &criteria).is_empty());
    }

    #[test]
    fn cupos_input_is_parsed() {
        let criteria = FilterCriteria::from_inputs(" 2 ", "Chía", "").unwrap();
        assert_eq!(criteria.cupos, Some(2));
        assert_eq!(criteria.salida.as_deref(), Some("Chía"));
        assert!(criteria.llegada.is_none());
    }

    #[test]
    fn non_numeric_cupos_is_rejected() {
        assert!(FilterCriteria::from_inputs("dos", "", "").is_err());
        assert!(FilterCriteria::from_inputs("-1", "", "").is_err());
    }
}
