//! Integration tests for the backend client (wiremock-based)

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain::{NewTrip, ReservationRequest, TripId};
use integration_backend::{BackendClient, BackendConfig, BackendError, HttpBackendClient};

fn config_for_mock(base_url: &str) -> BackendConfig {
    BackendConfig {
        base_url: base_url.to_string(),
        ..BackendConfig::for_testing()
    }
}

fn token() -> SecretString {
    SecretString::from("jwt-abc".to_string())
}

const fn sample_trips_json() -> &'static str {
    r#"[
        {
            "_id": "t-1",
            "startLocation": "Portal Norte",
            "endTrip": "Universidad de La Sabana",
            "startLocationCoords": {"lat": 4.7547, "lng": -74.0461},
            "endTripCoords": {"lat": "4.8612", "lng": "-74.0325"},
            "timeTrip": "06:30",
            "availablePlaces": 3,
            "priceTrip": "6500"
        },
        {
            "_id": "t-2",
            "startLocation": "Chía",
            "endTrip": "Calle 100",
            "timeTrip": "17:15",
            "availablePlaces": "1",
            "priceTrip": 5000,
            "route": "Autopista Norte"
        },
        {
            "_id": "t-3",
            "startLocation": "Suba",
            "endTrip": "Cajicá",
            "timeTrip": "07:00",
            "availablePlaces": "varios",
            "priceTrip": 4000
        }
    ]"#
}

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(serde_json::json!({
            "email": "laura@unisabana.edu.co",
            "password": "s3cret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "jwt-abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let token = assert_ok!(
        client
            .login(
                "laura@unisabana.edu.co",
                &SecretString::from("s3cret".to_string())
            )
            .await
    );
    assert_eq!(token.expose_secret(), "jwt-abc");
}

#[tokio::test]
async fn test_login_rejected_keeps_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "Credenciales inválidas"})),
        )
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .login("x@y.co", &SecretString::from("bad".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Unauthorized { status: 401, .. }));
    assert_eq!(err.server_message(), Some("Credenciales inválidas"));
}

#[tokio::test]
async fn test_fetch_profile() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"name": "Laura", "surName": "Gómez", "email": "l@u.co"})),
        )
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let profile = client.fetch_profile(&token()).await.unwrap();
    assert_eq!(profile.full_name(), "Laura Gómez");
}

#[tokio::test]
async fn test_list_trips_skips_malformed_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trips"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_trips_json()))
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let trips = client.list_trips(&token()).await.unwrap();

    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0].id.as_str(), "t-1");
    assert_eq!(trips[0].available_places, 3);
    assert!(trips[0].end_trip_coords.is_some());
    assert!((trips[0].price_trip - 6500.0).abs() < f64::EPSILON);
    assert_eq!(trips[1].route.as_deref(), Some("Autopista Norte"));
}

#[tokio::test]
async fn test_list_trips_skips_entries_missing_required_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "_id": "t-1",
                "startLocation": "Portal Norte",
                "endTrip": "Universidad de La Sabana",
                "timeTrip": "06:30",
                "availablePlaces": 3,
                "priceTrip": 6500
            },
            {
                "_id": "t-2",
                "endTrip": "Calle 100",
                "timeTrip": "17:15",
                "availablePlaces": 1,
                "priceTrip": 5000
            },
            {
                "_id": "t-3",
                "startLocation": "Chía",
                "endTrip": "Calle 100",
                "availablePlaces": null,
                "priceTrip": 5000
            }
        ])))
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let trips = assert_ok!(client.list_trips(&token()).await);

    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].id.as_str(), "t-1");
}

#[tokio::test]
async fn test_list_trips_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trips"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.list_trips(&token()).await.unwrap_err();
    assert!(matches!(
        err,
        BackendError::Api {
            status: 502,
            message: None
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_list_trips_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trips"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"trips": "nope"}"#))
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let result = client.list_trips(&token()).await;
    assert!(matches!(result, Err(BackendError::ParseError(_))));
}

#[tokio::test]
async fn test_reserve_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/trips/t-1/reserve"))
        .and(header("authorization", "Bearer jwt-abc"))
        .and(body_json(serde_json::json!({
            "requestedPlaces": 2,
            "pickup_dropPoint": ["Calle 80", "Portal Norte"]
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"reservationId": "r-55"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let request = ReservationRequest::new(
        2,
        &["Calle 80".to_string(), "Portal Norte".to_string(), "extra".to_string()],
        3,
    )
    .unwrap();
    let confirmation = client
        .reserve(&token(), &TripId::new("t-1").unwrap(), &request)
        .await
        .unwrap();

    assert_eq!(confirmation.reservation_id, "r-55");
    assert_eq!(confirmation.trip_id.as_str(), "t-1");
    assert_eq!(confirmation.seats, 2);
}

#[tokio::test]
async fn test_reserve_created_with_plain_text_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/trips/t-1/reserve"))
        .respond_with(ResponseTemplate::new(201).set_body_string("Reserva creada"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let request = ReservationRequest::new(1, &["Calle 80".to_string()], 3).unwrap();
    let confirmation = assert_ok!(
        client
            .reserve(&token(), &TripId::new("t-1").unwrap(), &request)
            .await
    );

    assert!(confirmation.reservation_id.is_empty());
    assert_eq!(confirmation.trip_id.as_str(), "t-1");
    assert_eq!(confirmation.seats, 1);
}

#[tokio::test]
async fn test_reserve_conflict_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/trips/t-2/reserve"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(serde_json::json!({"message": "No hay cupos suficientes"})),
        )
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let request = ReservationRequest::new(1, &["Chía".to_string()], 1).unwrap();
    let err = client
        .reserve(&token(), &TripId::new("t-2").unwrap(), &request)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(err.server_message(), Some("No hay cupos suficientes"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_reserve_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/trips/t-1/reserve"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = BackendConfig {
        timeout_secs: 1,
        ..config_for_mock(&server.uri())
    };
    let client = HttpBackendClient::new(&config).unwrap();
    let request = ReservationRequest::new(1, &["Calle 80".to_string()], 3).unwrap();
    let result = client
        .reserve(&token(), &TripId::new("t-1").unwrap(), &request)
        .await;
    assert!(matches!(result, Err(BackendError::Timeout { timeout_secs: 1 })));
}

#[tokio::test]
async fn test_create_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/trip/create"))
        .and(header("authorization", "Bearer jwt-abc"))
        .and(body_json(serde_json::json!({
            "startLocation": "Cajicá",
            "endTrip": "Universidad de La Sabana",
            "timeTrip": "06:45",
            "availablePlaces": 4,
            "priceTrip": 3500.0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"tripId": 981})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpBackendClient::new(&config_for_mock(&server.uri())).unwrap();
    let trip = NewTrip::new("Cajicá", "Universidad de La Sabana", "06:45", 4, 3500.0, None).unwrap();
    let id = client.create_trip(&token(), &trip).await.unwrap();
    assert_eq!(id.as_str(), "981");
}

#[tokio::test]
async fn test_connection_refused() {
    let client = HttpBackendClient::new(&config_for_mock("http://127.0.0.1:9")).unwrap();
    let result = client.list_trips(&token()).await;
    assert!(matches!(result, Err(BackendError::ConnectionFailed(_))));
}
