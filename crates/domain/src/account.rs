//! Account profile types for `/accounts/me/`.

use serde::{Deserialize, Serialize};

/// Profile of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Account name (read-only on the server).
    pub username: String,
    /// Account email (read-only on the server).
    #[serde(default)]
    pub email: String,
    /// Name shown next to posts.
    #[serde(default)]
    pub display_name: String,
    /// Personal site URL.
    #[serde(default)]
    pub homepage: String,
    /// Avatar image URL, if one was uploaded.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Free-form biography.
    #[serde(default)]
    pub bio: String,
}

impl Profile {
    /// Name to show for this account, falling back to the username.
    #[must_use]
    pub fn shown_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// Partial profile update; only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New homepage URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// New biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Returns true if no field would be changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.homepage.is_none() && self.bio.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_profile_defaults_missing_fields() {
        let profile: Profile = serde_json::from_str(r#"{"username":"ann"}"#).unwrap();
        assert_eq!(profile.shown_name(), "ann");
        assert_eq!(profile.avatar, None);
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = ProfileUpdate {
            bio: Some("hello".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"bio": "hello"})
        );
    }
}
