//! Authentication port

use async_trait::async_trait;
use domain::UserProfile;
#[cfg(test)]
use mockall::automock;
use secrecy::SecretString;

use crate::error::ApplicationError;

/// Port for signing in and reading the signed-in user's profile
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchange credentials for a bearer token
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SecretString, ApplicationError>;

    /// Fetch the profile of the user owning `token`
    async fn fetch_profile(&self, token: &SecretString) -> Result<UserProfile, ApplicationError>;
}
