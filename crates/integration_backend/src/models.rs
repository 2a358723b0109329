//! Backend wire format
//!
//! Field names follow the backend's JSON (`startLocation`,
//! `pickup_dropPoint`, ...). Numbers may arrive as JSON numbers or as
//! numeric strings, so they are read through [`Lenient`].

use domain::{GeoLocation, NewTrip, ReservationRequest, Trip, TripId, UserProfile};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// A scalar that may be encoded as a number or a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Lenient {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl Lenient {
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Unsigned(n) => Some(*n as f64),
            Self::Signed(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
        .filter(|n: &f64| n.is_finite())
    }

    pub(crate) fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Unsigned(n) => u32::try_from(*n).ok(),
            Self::Signed(n) => u32::try_from(*n).ok(),
            Self::Float(n) => whole_u32(*n),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<u32>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_u32))
            },
        }
    }

    pub(crate) fn as_id(&self) -> Option<String> {
        match self {
            Self::Unsigned(n) => Some(n.to_string()),
            Self::Signed(n) => Some(n.to_string()),
            Self::Float(_) => None,
            Self::Text(s) => Some(s.clone()),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_u32(n: f64) -> Option<u32> {
    (n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n)).then(|| n as u32)
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sur_name: String,
}

impl From<ProfileResponse> for UserProfile {
    fn from(raw: ProfileResponse) -> Self {
        Self::new(raw.name, raw.sur_name)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCoords {
    pub lat: Lenient,
    #[serde(alias = "lng")]
    pub lon: Lenient,
}

impl RawCoords {
    fn to_location(&self) -> Option<GeoLocation> {
        GeoLocation::new(self.lat.as_f64()?, self.lon.as_f64()?).ok()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTrip {
    #[serde(alias = "_id", alias = "tripId")]
    pub id: Lenient,
    pub start_location: String,
    pub end_trip: String,
    #[serde(default)]
    pub start_location_coords: Option<RawCoords>,
    #[serde(default)]
    pub end_trip_coords: Option<RawCoords>,
    #[serde(default)]
    pub time_trip: String,
    pub available_places: Lenient,
    pub price_trip: Lenient,
    #[serde(default)]
    pub route: Option<String>,
}

impl TryFrom<RawTrip> for Trip {
    type Error = BackendError;

    fn try_from(raw: RawTrip) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .as_id()
            .ok_or_else(|| BackendError::InvalidData(format!("trip id {:?}", raw.id)))?;
        let id = TripId::new(id).map_err(|e| BackendError::InvalidData(e.to_string()))?;

        let places = raw.available_places.as_u32().ok_or_else(|| {
            BackendError::InvalidData(format!(
                "trip {id}: availablePlaces {:?}",
                raw.available_places
            ))
        })?;
        let price = raw.price_trip.as_f64().ok_or_else(|| {
            BackendError::InvalidData(format!("trip {id}: priceTrip {:?}", raw.price_trip))
        })?;

        let trip = Self::new(
            id,
            raw.start_location,
            raw.end_trip,
            raw.time_trip,
            places,
            price,
        )
        .map_err(|e| BackendError::InvalidData(e.to_string()))?
        .with_coords(
            raw.start_location_coords.as_ref().and_then(RawCoords::to_location),
            raw.end_trip_coords.as_ref().and_then(RawCoords::to_location),
        );

        Ok(match raw.route {
            Some(route) => trip.with_route(route),
            None => trip,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReserveRequest<'a> {
    #[serde(rename = "requestedPlaces")]
    pub requested_places: u32,
    #[serde(rename = "pickup_dropPoint")]
    pub pickup_drop_points: &'a [String],
}

impl<'a> From<&'a ReservationRequest> for ReserveRequest<'a> {
    fn from(request: &'a ReservationRequest) -> Self {
        Self {
            requested_places: request.requested_places(),
            pickup_drop_points: request.pickup_drop_points(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReserveResponse {
    #[serde(default)]
    pub reservation_id: Option<Lenient>,
    #[serde(default, alias = "_id")]
    pub id: Option<Lenient>,
}

impl ReserveResponse {
    pub(crate) fn reservation_id(&self) -> Option<String> {
        self.reservation_id
            .as_ref()
            .or(self.id.as_ref())
            .and_then(Lenient::as_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTripRequest<'a> {
    pub start_location: &'a str,
    pub end_trip: &'a str,
    pub time_trip: String,
    pub available_places: u32,
    pub price_trip: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<&'a str>,
}

impl<'a> From<&'a NewTrip> for CreateTripRequest<'a> {
    fn from(trip: &'a NewTrip) -> Self {
        Self {
            start_location: &trip.start_location,
            end_trip: &trip.end_trip,
            time_trip: trip.time_label(),
            available_places: trip.available_places,
            price_trip: trip.price_trip,
            route: trip.route.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTripResponse {
    #[serde(alias = "id", alias = "_id")]
    pub trip_id: Lenient,
}

/// Error body; the backend uses `message`, some routes `error`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}
