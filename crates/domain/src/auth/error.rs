//! Refresh failure taxonomy

use thiserror::Error;

/// Why a token refresh did not yield a new access token.
///
/// The same outcome is delivered to every caller queued behind a refresh,
/// so this type is `Clone`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// The refresh call failed at the network level.
    #[error("refresh request failed: {message}")]
    Transport {
        /// Transport error description.
        message: String,
    },

    /// The refresh endpoint answered with a non-success status.
    #[error("refresh rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The refresh response had no usable access token.
    #[error("refresh response has no `{field}` token")]
    MissingAccessToken {
        /// Field that was expected to hold the token.
        field: String,
    },

    /// The refresh response body was not a JSON object.
    #[error("refresh response is not valid JSON: {message}")]
    InvalidPayload {
        /// Parser error description.
        message: String,
    },

    /// The refresh call did not complete in time.
    #[error("refresh timed out after {timeout_ms} ms")]
    TimedOut {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The new token could not be persisted.
    #[error("could not persist refreshed token: {message}")]
    Store {
        /// Store error description.
        message: String,
    },

    /// The task performing the refresh was dropped before it finished.
    #[error("refresh abandoned before completion")]
    Abandoned,
}

impl RefreshError {
    /// Returns true for failures where the refresh endpoint was never reached
    /// or never answered.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::TimedOut { .. })
    }

    /// Returns true when the endpoint answered 2xx with an unusable payload.
    #[must_use]
    pub const fn is_payload(&self) -> bool {
        matches!(
            self,
            Self::MissingAccessToken { .. } | Self::InvalidPayload { .. }
        )
    }
}
