//! Token and credential types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which a token is kept in the token store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKey {
    /// Short-lived access token.
    Access,
    /// Longer-lived refresh token.
    Refresh,
}

impl TokenKey {
    /// Both keys, in the order they are cleared.
    pub const ALL: [Self; 2] = [Self::Access, Self::Refresh];

    /// Returns the storage key string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access/refresh token pair as issued by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// The access token.
    pub access: String,
    /// The refresh token, when the backend issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl TokenPair {
    /// Creates a pair with both tokens.
    #[must_use]
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: Some(refresh.into()),
        }
    }

    /// Returns true if the pair carries a usable refresh token.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// Returns the `Authorization` header value for the access token.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        bearer(&self.access)
    }
}

/// Formats a bearer credential.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Payload for `POST /accounts/login/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Creates a login payload.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Payload for `POST /accounts/register/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired account name.
    pub username: String,
    /// Contact email, may be empty.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl RegisterRequest {
    /// Creates a registration payload.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}
