//! Application error types

use parley_domain::{DomainError, RefreshError, ResponseSpec, UNAUTHORIZED};
use thiserror::Error;

use crate::ports::{HttpClientError, TokenStoreError};

/// Longest response body kept in a status error.
const MAX_ERROR_BODY: usize = 512;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// An expired access token could not be replaced.
    #[error("token refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    /// The token store failed.
    #[error("token store error: {0}")]
    Store(#[from] TokenStoreError),

    /// A success response did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApplicationError {
    /// Builds a status error from a failed response.
    #[must_use]
    pub fn from_response(response: &ResponseSpec) -> Self {
        let mut body = response.text();
        if body.len() > MAX_ERROR_BODY {
            let mut end = MAX_ERROR_BODY;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        Self::Status {
            status: response.status,
            body,
        }
    }

    /// HTTP status carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for an authorization failure (401) from the server.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == UNAUTHORIZED)
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
