//! Client settings
//!
//! Where the backend lives and how its account endpoints are shaped. The
//! refresh endpoint path and the name of the access-token field differ
//! between backend deployments, so both are settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Base URL used when nothing overrides it.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Settings for the authenticated API client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// API root, without trailing slash.
    pub base_url: String,
    /// Credential exchange endpoint.
    pub login_path: String,
    /// Account creation endpoint.
    pub register_path: String,
    /// Token refresh endpoint (`/accounts/refresh/` or `/auth/refresh/`).
    pub refresh_path: String,
    /// Profile endpoint of the signed-in account.
    pub profile_path: String,
    /// Field of the refresh response holding the new access token
    /// (`access` or `access_token`).
    pub access_field: String,
    /// Upper bound for a single refresh call, in milliseconds.
    pub refresh_timeout_ms: u64,
    /// Upper bound for ordinary requests, in milliseconds.
    pub request_timeout_ms: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_path: "/accounts/login/".to_string(),
            register_path: "/accounts/register/".to_string(),
            refresh_path: "/accounts/refresh/".to_string(),
            profile_path: "/accounts/me/".to_string(),
            access_field: "access".to_string(),
            refresh_timeout_ms: 30_000,
            request_timeout_ms: 30_000,
            user_agent: concat!("Parley/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientSettings {
    /// Creates default settings pointing at `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Joins an API path onto the base URL.
    ///
    /// Absolute `http(s)://` URLs are returned unchanged.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Full URL of the refresh endpoint.
    #[must_use]
    pub fn refresh_url(&self) -> String {
        self.endpoint(&self.refresh_path)
    }

    /// Refresh call timeout.
    #[must_use]
    pub const fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }

    /// Ordinary request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Checks that the settings describe a usable client.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed base URL, an empty field name or a
    /// zero timeout.
    pub fn validate(&self) -> DomainResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "unsupported scheme `{}`: {}",
                url.scheme(),
                self.base_url
            )));
        }
        if self.access_field.trim().is_empty() {
            return Err(DomainError::InvalidSetting {
                name: "access_field",
                reason: "must not be empty".to_string(),
            });
        }
        if self.refresh_timeout_ms == 0 {
            return Err(DomainError::InvalidSetting {
                name: "refresh_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(DomainError::InvalidSetting {
                name: "request_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
