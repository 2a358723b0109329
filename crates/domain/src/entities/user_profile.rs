//! User profile entity

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Given name
    pub name: String,
    /// Surname
    pub sur_name: String,
}

impl UserProfile {
    /// Create a new profile
    #[must_use]
    pub fn new(name: impl Into<String>, sur_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sur_name: sur_name.into(),
        }
    }

    /// Name and surname joined for display
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.trim(), self.sur_name.trim())
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_parts() {
        let profile = UserProfile::new("Laura", "Gómez");
        assert_eq!(profile.full_name(), "Laura Gómez");
    }

    #[test]
    fn full_name_without_surname() {
        let profile = UserProfile::new("Laura", "");
        assert_eq!(profile.full_name(), "Laura");
    }
}
