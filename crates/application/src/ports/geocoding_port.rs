//! Place search port
//!
//! Free-text place lookups used to suggest origins and destinations.

use async_trait::async_trait;
use domain::PlaceSuggestion;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for geocoding place searches
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Search places matching `query`, best match first
    ///
    /// Returns at most `limit` results, with names localized for `language`
    /// (an `Accept-Language` value such as `"es"`).
    async fn search(
        &self,
        query: &str,
        limit: u8,
        language: &str,
    ) -> Result<Vec<PlaceSuggestion>, ApplicationError>;
}
