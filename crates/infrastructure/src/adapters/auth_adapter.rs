//! Auth adapter - Implements AuthPort using integration_backend

use std::sync::Arc;

use application::ApplicationError;
use application::ports::AuthPort;
use async_trait::async_trait;
use domain::UserProfile;
use integration_backend::BackendClient;
use secrecy::SecretString;
use tracing::instrument;

use super::error_mapping::map_backend_error;

/// Adapter for the backend login and profile endpoints
pub struct BackendAuthAdapter {
    client: Arc<dyn BackendClient>,
}

impl std::fmt::Debug for BackendAuthAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendAuthAdapter")
            .field("client", &"dyn BackendClient")
            .finish()
    }
}

impl BackendAuthAdapter {
    /// Create a new auth adapter
    pub fn new(client: Arc<dyn BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthPort for BackendAuthAdapter {
    #[instrument(skip(self, password))]
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SecretString, ApplicationError> {
        if email.trim().is_empty() {
            return Err(domain::DomainError::validation("email must not be empty").into());
        }
        self.client
            .login(email.trim(), password)
            .await
            .map_err(map_backend_error)
    }

    #[instrument(skip(self, token))]
    async fn fetch_profile(&self, token: &SecretString) -> Result<UserProfile, ApplicationError> {
        self.client
            .fetch_profile(token)
            .await
            .map_err(map_backend_error)
    }
}

#[cfg(test)]
mod tests {
    use domain::{NewTrip, ReservationConfirmation, ReservationRequest, Trip, TripId};
    use integration_backend::BackendError;
    use mockall::mock;
    use secrecy::ExposeSecret;

    use super::*;

    mock! {
        pub Backend {}

        #[async_trait::async_trait]
        impl BackendClient for Backend {
            async fn login(&self, email: &str, password: &SecretString) -> Result<SecretString, BackendError>;
            async fn fetch_profile(&self, token: &SecretString) -> Result<UserProfile, BackendError>;
            async fn list_trips(&self, token: &SecretString) -> Result<Vec<Trip>, BackendError>;
            async fn reserve(&self, token: &SecretString, trip_id: &TripId, request: &ReservationRequest) -> Result<ReservationConfirmation, BackendError>;
            async fn create_trip(&self, token: &SecretString, trip: &NewTrip) -> Result<TripId, BackendError>;
        }
    }

    fn password() -> SecretString {
        SecretString::from("s3cret".to_string())
    }

    #[tokio::test]
    async fn login_trims_the_email() {
        let mut backend = MockBackend::new();
        backend
            .expect_login()
            .withf(|email, _| email == "laura@unisabana.edu.co")
            .times(1)
            .returning(|_, _| Ok(SecretString::from("jwt".to_string())));

        let adapter = BackendAuthAdapter::new(Arc::new(backend));
        let token = adapter
            .login("  laura@unisabana.edu.co ", &password())
            .await
            .unwrap();
        assert_eq!(token.expose_secret(), "jwt");
    }

    #[tokio::test]
    async fn blank_email_never_reaches_the_backend() {
        let mut backend = MockBackend::new();
        backend.expect_login().times(0);

        let adapter = BackendAuthAdapter::new(Arc::new(backend));
        let err = adapter.login("   ", &password()).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn rejected_credentials_keep_the_server_message() {
        let mut backend = MockBackend::new();
        backend.expect_login().returning(|_, _| {
            Err(BackendError::Unauthorized {
                status: 401,
                message: Some("Credenciales inválidas".to_string()),
            })
        });

        let adapter = BackendAuthAdapter::new(Arc::new(backend));
        let err = adapter
            .login("laura@unisabana.edu.co", &password())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Credenciales inválidas");
    }
}
