//! Session context and authentication service
//!
//! A [`Session`] is created at sign-in, handed to every service that talks to
//! the backend, and ended on logout. Once ended, every authorized call fails
//! with [`ApplicationError::NotAuthenticated`].

use std::sync::Arc;

use domain::UserProfile;
use parking_lot::RwLock;
use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::AuthPort;

/// Authenticated user session
pub struct Session {
    token: RwLock<Option<SecretString>>,
    profile: RwLock<Option<UserProfile>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("active", &self.is_active())
            .field("profile", &*self.profile.read())
            .finish()
    }
}

impl Session {
    /// Start a session from an existing bearer token
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
            profile: RwLock::new(None),
        }
    }

    /// A session without credentials; authorized calls fail
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            token: RwLock::new(None),
            profile: RwLock::new(None),
        }
    }

    /// Bearer token for backend calls
    pub fn token(&self) -> Result<SecretString, ApplicationError> {
        self.token
            .read()
            .clone()
            .ok_or(ApplicationError::NotAuthenticated)
    }

    /// Whether the session still holds a token
    pub fn is_active(&self) -> bool {
        self.token.read().is_some()
    }

    /// Profile of the signed-in user, once fetched
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.read().clone()
    }

    fn set_profile(&self, profile: UserProfile) {
        *self.profile.write() = Some(profile);
    }

    /// Tear the session down, dropping the token and profile
    pub fn end(&self) {
        *self.token.write() = None;
        *self.profile.write() = None;
    }
}

/// Sign-in / sign-out use cases
pub struct AuthService {
    auth: Arc<dyn AuthPort>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("auth", &"<AuthPort>")
            .finish()
    }
}

impl AuthService {
    /// Create a new auth service
    #[must_use]
    pub fn new(auth: Arc<dyn AuthPort>) -> Self {
        Self { auth }
    }

    /// Sign in and start a session
    ///
    /// The profile is fetched right away; a failure there is logged and
    /// leaves the session usable without a profile.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Arc<Session>, ApplicationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(domain::DomainError::validation("email is required").into());
        }

        let token = self.auth.login(email, password).await?;
        let session = Arc::new(Session::new(token));
        info!("Signed in");

        if let Err(e) = self.refresh_profile(&session).await {
            warn!(error = %e, "Could not load user profile after sign-in");
        }

        Ok(session)
    }

    /// Fetch the profile for `session` and cache it there
    #[instrument(skip(self, session))]
    pub async fn refresh_profile(&self, session: &Session) -> Result<UserProfile, ApplicationError> {
        let token = session.token()?;
        let profile = self.auth.fetch_profile(&token).await?;
        debug!(name = %profile.full_name(), "Loaded user profile");
        session.set_profile(profile.clone());
        Ok(profile)
    }

    /// End the session
    pub fn logout(&self, session: &Session) {
        session.end();
        info!("Signed out");
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::ports::MockAuthPort;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn anonymous_session_has_no_token() {
        let session = Session::anonymous();
        assert!(!session.is_active());
        assert!(matches!(
            session.token(),
            Err(ApplicationError::NotAuthenticated)
        ));
    }

    #[test]
    fn ended_session_rejects_token_access() {
        let session = Session::new(secret("tok"));
        assert_eq!(session.token().unwrap().expose_secret(), "tok");

        session.end();
        assert!(!session.is_active());
        assert!(session.token().is_err());
        assert!(session.profile().is_none());
    }

    #[test]
    fn debug_does_not_leak_token() {
        let session = Session::new(secret("super-secret-token"));
        let debug = format!("{session:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("active: true"));
    }

    #[tokio::test]
    async fn login_starts_session_with_profile() {
        let mut auth = MockAuthPort::new();
        auth.expect_login()
            .withf(|email, _| email.eq_ignore_ascii_case("laura@unisabana.edu.co"))
            .times(1)
            .returning(|_, _| Ok(SecretString::from("jwt-123".to_string())));
        auth.expect_fetch_profile()
            .times(1)
            .returning(|_| Ok(UserProfile::new("Laura", "Gómez")));

        let service = AuthService::new(Arc::new(auth));
        let session = service
            .login(" laura@unisabana.edu.co ", &secret("pw"))
            .await
            .unwrap();

        assert_eq!(session.token().unwrap().expose_secret(), "jwt-123");
        assert_eq!(session.profile().unwrap().full_name(), "Laura Gómez");
    }

    #[tokio::test]
    async fn profile_failure_keeps_session() {
        let mut auth = MockAuthPort::new();
        auth.expect_login()
            .returning(|_, _| Ok(SecretString::from("jwt-123".to_string())));
        auth.expect_fetch_profile()
            .returning(|_| Err(ApplicationError::Network("timeout".to_string())));

        let service = AuthService::new(Arc::new(auth));
        let session = service.login("a@b.co", &secret("pw")).await.unwrap();

        assert!(session.is_active());
        assert!(session.profile().is_none());
    }

    #[tokio::test]
    async fn rejected_credentials_propagate() {
        let mut auth = MockAuthPort::new();
        auth.expect_login().returning(|_, _| {
            Err(ApplicationError::Server {
                status: 401,
                message: Some("Credenciales inválidas".to_string()),
            })
        });

        let service = AuthService::new(Arc::new(auth));
        let err = service.login("a@b.co", &secret("bad")).await.unwrap_err();
        assert_eq!(err.user_message(), "Credenciales inválidas");
    }

    #[tokio::test]
    async fn blank_email_never_reaches_backend() {
        let auth = MockAuthPort::new();
        let service = AuthService::new(Arc::new(auth));
        let err = service.login("   ", &secret("pw")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn logout_ends_session() {
        let service = AuthService::new(Arc::new(MockAuthPort::new()));
        let session = Session::new(secret("tok"));
        service.logout(&session);
        assert!(!session.is_active());
    }
}
