//! The refresh call.
//!
//! `POST {base}{refresh_path}` with `{"refresh": <token>}`, sent without
//! credential. Any failure clears the stored tokens before it is returned.

use parley_domain::{RefreshError, RequestSpec, ResponseSpec, TokenKey, TokenPair};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::AuthenticatedHttpClient;
use crate::ports::{HttpClient, TokenStore};

/// Field that may carry a rotated refresh token.
const ROTATED_REFRESH_FIELD: &str = "refresh";

#[derive(Debug, Serialize)]
struct RefreshPayload<'a> {
    refresh: &'a str,
}

impl<C: HttpClient, S: TokenStore> AuthenticatedHttpClient<C, S> {
    /// Exchanges the refresh token for a new access token and stores it.
    pub(super) async fn refresh_access_token(&self, refresh: &str) -> Result<String, RefreshError> {
        info!(url = %self.settings.refresh_url(), "refreshing access token");

        let result = tokio::time::timeout(
            self.settings.refresh_timeout(),
            self.request_new_access(refresh),
        )
        .await
        .unwrap_or(Err(RefreshError::TimedOut {
            timeout_ms: self.settings.refresh_timeout_ms,
        }));

        match result {
            Ok(access) => {
                info!("access token refreshed");
                Ok(access)
            }
            Err(error) => {
                let cause = if error.is_payload() {
                    "unusable refresh response"
                } else if error.is_transport() {
                    "refresh endpoint unreachable"
                } else {
                    "token refresh failed"
                };
                warn!(%error, "{cause}, clearing stored tokens");
                self.discard_tokens().await;
                Err(error)
            }
        }
    }

    async fn request_new_access(&self, refresh: &str) -> Result<String, RefreshError> {
        let payload = serde_json::to_value(RefreshPayload { refresh }).map_err(|e| {
            RefreshError::InvalidPayload {
                message: e.to_string(),
            }
        })?;
        let request = RequestSpec::post(self.settings.refresh_url(), payload);

        let response = self
            .http
            .execute(&request)
            .await
            .map_err(|e| RefreshError::Transport {
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
                body: response.text(),
            });
        }

        let grant = parse_grant(&response, &self.settings.access_field)?;

        self.store
            .set(TokenKey::Access, &grant.access)
            .await
            .map_err(|e| RefreshError::Store {
                message: e.to_string(),
            })?;
        if let Some(rotated) = &grant.refresh {
            self.store
                .set(TokenKey::Refresh, rotated)
                .await
                .map_err(|e| RefreshError::Store {
                    message: e.to_string(),
                })?;
        }

        Ok(grant.access)
    }
}

/// Extracts the new access token, and a rotated refresh token if present.
fn parse_grant(response: &ResponseSpec, access_field: &str) -> Result<TokenPair, RefreshError> {
    let body: Value = response
        .json()
        .map_err(|e| RefreshError::InvalidPayload {
            message: e.to_string(),
        })?;

    let access = non_empty_str(&body, access_field).ok_or_else(|| {
        RefreshError::MissingAccessToken {
            field: access_field.to_string(),
        }
    })?;

    Ok(TokenPair {
        access: access.to_string(),
        refresh: non_empty_str(&body, ROTATED_REFRESH_FIELD).map(String::from),
    })
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_grant_default_field() {
        let response = ResponseSpec::json_body(200, &json!({"access": "A2"}));
        let grant = parse_grant(&response, "access").unwrap();
        assert_eq!(grant.access, "A2");
        assert_eq!(grant.refresh, None);
    }

    #[test]
    fn test_parse_grant_configured_field_and_rotation() {
        let response =
            ResponseSpec::json_body(200, &json!({"access_token": "A2", "refresh": "R2"}));
        let grant = parse_grant(&response, "access_token").unwrap();
        assert_eq!(grant, TokenPair::new("A2", "R2"));
    }

    #[test]
    fn test_parse_grant_missing_or_empty_field() {
        for body in [json!({}), json!({"access": ""}), json!({"access": 42})] {
            let response = ResponseSpec::json_body(200, &body);
            assert_eq!(
                parse_grant(&response, "access"),
                Err(RefreshError::MissingAccessToken {
                    field: "access".into()
                })
            );
        }
    }

    #[test]
    fn test_parse_grant_not_json() {
        let response = ResponseSpec {
            status: 200,
            body: b"<html>".to_vec(),
            ..Default::default()
        };
        assert!(matches!(
            parse_grant(&response, "access"),
            Err(RefreshError::InvalidPayload { .. })
        ));
    }
}
