//! Drive2U REST backend client

use std::time::Duration;

use async_trait::async_trait;
use domain::{NewTrip, ReservationConfirmation, ReservationRequest, Trip, TripId, UserProfile};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::models::{
    CreateTripRequest, CreateTripResponse, ErrorBody, LoginRequest, LoginResponse,
    ProfileResponse, RawTrip, ReserveRequest, ReserveResponse,
};

/// Trait for Drive2U backend clients
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// `POST /login`: exchange credentials for a bearer token
    async fn login(&self, email: &str, password: &SecretString)
    -> Result<SecretString, BackendError>;

    /// `GET /user`: profile of the token's owner
    async fn fetch_profile(&self, token: &SecretString) -> Result<UserProfile, BackendError>;

    /// `GET /trips`: every published trip, in backend order
    async fn list_trips(&self, token: &SecretString) -> Result<Vec<Trip>, BackendError>;

    /// `POST /trips/{id}/reserve`: reserve seats on a trip
    async fn reserve(
        &self,
        token: &SecretString,
        trip_id: &TripId,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, BackendError>;

    /// `POST /trip/create`: publish a new trip
    async fn create_trip(&self, token: &SecretString, trip: &NewTrip)
    -> Result<TripId, BackendError>;
}

/// reqwest-based backend client
#[derive(Debug)]
pub struct HttpBackendClient {
    client: Client,
    config: BackendConfig,
    base_url: url::Url,
}

impl HttpBackendClient {
    /// Create a new backend client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        config.validate().map_err(BackendError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        // trailing slash so that `join` appends instead of replacing the last segment
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url =
            url::Url::parse(&base).map_err(|e| BackendError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            base_url,
        })
    }

    fn url(&self, path: &str) -> Result<url::Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::ConfigurationError(format!("{path}: {e}")))
    }

    fn authorized(builder: RequestBuilder, token: &SecretString) -> RequestBuilder {
        builder.bearer_auth(token.expose_secret())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);
        debug!(status = status.as_u16(), ?message, "Backend rejected request");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            _ => BackendError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn json<T: DeserializeOwned>(&self, response: Response) -> Result<T, BackendError> {
        let body = response.text().await.map_err(|e| self.transport_error(&e))?;
        serde_json::from_str(&body).map_err(|e| BackendError::ParseError(e.to_string()))
    }

    fn transport_error(&self, e: &reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            BackendError::ConnectionFailed(e.to_string())
        }
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    #[instrument(skip(self, password))]
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SecretString, BackendError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let response = self
            .send(self.client.post(self.url("login")?).json(&body))
            .await?;
        let login: LoginResponse = self.json(response).await?;

        if login.token.trim().is_empty() {
            return Err(BackendError::InvalidData("empty token".to_string()));
        }
        debug!("Login accepted");
        Ok(SecretString::from(login.token))
    }

    #[instrument(skip(self, token))]
    async fn fetch_profile(&self, token: &SecretString) -> Result<UserProfile, BackendError> {
        let request = Self::authorized(self.client.get(self.url("user")?), token);
        let response = self.send(request).await?;
        let profile: ProfileResponse = self.json(response).await?;
        Ok(profile.into())
    }

    #[instrument(skip(self, token))]
    async fn list_trips(&self, token: &SecretString) -> Result<Vec<Trip>, BackendError> {
        let request = Self::authorized(self.client.get(self.url("trips")?), token);
        let response = self.send(request).await?;
        let entries: Vec<serde_json::Value> = self.json(response).await?;

        let total = entries.len();
        let trips: Vec<Trip> = entries
            .into_iter()
            .filter_map(|entry| {
                let parsed = serde_json::from_value::<RawTrip>(entry)
                    .map_err(|e| BackendError::ParseError(e.to_string()))
                    .and_then(Trip::try_from);
                match parsed {
                    Ok(trip) => Some(trip),
                    Err(e) => {
                        warn!(error = %e, "Skipping malformed trip");
                        None
                    },
                }
            })
            .collect();
        debug!(total, kept = trips.len(), "Fetched trips");
        Ok(trips)
    }

    #[instrument(skip(self, token, request), fields(seats = request.requested_places()))]
    async fn reserve(
        &self,
        token: &SecretString,
        trip_id: &TripId,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, BackendError> {
        let url = self.url(&format!("trips/{}/reserve", urlencode_segment(trip_id.as_str())))?;
        let body = ReserveRequest::from(request);
        let response = self
            .send(Self::authorized(self.client.post(url), token).json(&body))
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            debug!(status = status.as_u16(), "Reservation accepted with non-201 status");
        }

        let text = response.text().await.map_err(|e| self.transport_error(&e))?;
        // a 2xx already confirms the reservation, the body only carries its id
        let parsed: ReserveResponse = if text.trim().is_empty() {
            ReserveResponse::default()
        } else {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(error = %e, "Unreadable reservation response body");
                ReserveResponse::default()
            })
        };
        let reservation_id = parsed.reservation_id().unwrap_or_else(|| {
            warn!("Reservation response carried no id");
            String::new()
        });

        Ok(ReservationConfirmation {
            reservation_id,
            trip_id: trip_id.clone(),
            seats: request.requested_places(),
        })
    }

    #[instrument(skip(self, token, trip), fields(from = %trip.start_location, to = %trip.end_trip))]
    async fn create_trip(
        &self,
        token: &SecretString,
        trip: &NewTrip,
    ) -> Result<TripId, BackendError> {
        let body = CreateTripRequest::from(trip);
        let request = Self::authorized(self.client.post(self.url("trip/create")?), token).json(&body);
        let response = self.send(request).await?;
        let created: CreateTripResponse = self.json(response).await?;

        let id = created
            .trip_id
            .as_id()
            .ok_or_else(|| BackendError::InvalidData(format!("trip id {:?}", created.trip_id)))?;
        TripId::new(id).map_err(|e| BackendError::InvalidData(e.to_string()))
    }
}

/// Percent-encode a single path segment
fn urlencode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
