//! Response specification type

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::request::Headers;

/// HTTP status of an authorization failure.
pub const UNAUTHORIZED: u16 = 401;

/// HTTP response as seen by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSpec {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Raw response body
    pub body: Vec<u8>,
    /// Time from send to fully read body
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a response.
    #[must_use]
    pub const fn new(status: u16, headers: Headers, body: Vec<u8>, duration: Duration) -> Self {
        Self {
            status,
            headers,
            body,
            duration,
        }
    }

    /// Creates a response with a JSON body and no timing, mostly for fakes.
    #[must_use]
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        let mut headers = Headers::new();
        headers.set("Content-Type", "application/json");
        Self::new(status, headers, body.to_string().into_bytes(), Duration::ZERO)
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true for an authorization failure (401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == UNAUTHORIZED
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self::new(0, Headers::new(), Vec::new(), Duration::ZERO)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        let ok = ResponseSpec {
            status: 204,
            ..Default::default()
        };
        assert!(ok.is_success());
        assert!(!ok.is_unauthorized());

        let denied = ResponseSpec {
            status: 401,
            ..Default::default()
        };
        assert!(!denied.is_success());
        assert!(denied.is_unauthorized());
    }

    #[test]
    fn test_json_body() {
        let response = ResponseSpec::json_body(200, &serde_json::json!({"access": "A2"}));
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["access"], "A2");
        assert_eq!(response.headers.get("content-type"), Some("application/json"));
        assert_eq!(response.text(), r#"{"access":"A2"}"#);
    }
}
