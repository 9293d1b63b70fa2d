//! Login use case.

use parley_domain::{HttpMethod, LoginRequest, TokenKey, TokenPair};
use tracing::info;

use crate::client::{AuthenticatedHttpClient, decode};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{HttpClient, TokenStore};

/// Exchanges account credentials for a token pair and stores it.
pub struct Login<C, S> {
    client: AuthenticatedHttpClient<C, S>,
}

impl<C: HttpClient, S: TokenStore> Login<C, S> {
    /// Creates a new `Login` use case.
    #[must_use]
    pub const fn new(client: AuthenticatedHttpClient<C, S>) -> Self {
        Self { client }
    }

    /// Posts the credentials to the login endpoint.
    ///
    /// The request carries no stored credential and a 401 is returned as is,
    /// without a refresh attempt. The access token is always stored; the
    /// refresh token only when the response carries one.
    ///
    /// # Errors
    /// - [`ApplicationError::Status`] if the backend rejects the credentials
    /// - [`ApplicationError::Decode`] if the response has no access token
    /// - [`ApplicationError::Store`] if the tokens cannot be stored
    pub async fn execute(&self, credentials: &LoginRequest) -> ApplicationResult<TokenPair> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ApplicationError::Decode(format!("login payload: {e}")))?;
        let request = self
            .client
            .request(HttpMethod::Post, &self.client.settings().login_path)
            .with_json(body);

        let response = self.client.execute_public(request).await?;
        let pair: TokenPair = decode(&response)?;
        if pair.access.is_empty() {
            return Err(ApplicationError::Decode(
                "login response carries an empty access token".to_string(),
            ));
        }

        let store = self.client.store();
        store.set(TokenKey::Access, &pair.access).await?;
        if let Some(refresh) = pair.refresh.as_deref().filter(|r| !r.is_empty()) {
            store.set(TokenKey::Refresh, refresh).await?;
        }

        info!(username = %credentials.username, refreshable = pair.can_refresh(), "logged in");
        Ok(pair)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::sync::Arc;

    use parley_domain::ResponseSpec;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::auth::InMemoryTokenStore;
    use crate::use_cases::testing::{ScriptedHttp, settings};

    fn login(
        http: ScriptedHttp,
        store: InMemoryTokenStore,
    ) -> (Login<ScriptedHttp, InMemoryTokenStore>, Arc<ScriptedHttp>) {
        let http = Arc::new(http);
        let client =
            AuthenticatedHttpClient::new(Arc::clone(&http), Arc::new(store), settings()).unwrap();
        (Login::new(client), http)
    }

    #[tokio::test]
    async fn test_login_stores_both_tokens() {
        let store = InMemoryTokenStore::new();
        let (login, http) = login(
            ScriptedHttp::replying([ResponseSpec::json_body(
                200,
                &json!({"access": "A1", "refresh": "R1"}),
            )]),
            store.clone(),
        );

        let pair = login
            .execute(&LoginRequest::new("ann", "secret"))
            .await
            .unwrap();

        assert_eq!(pair, TokenPair::new("A1", "R1"));
        assert_eq!(store.pair().await.unwrap(), Some(TokenPair::new("A1", "R1")));

        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, "http://api.test/api/v1/accounts/login/");
        assert_eq!(
            requests[0].body,
            Some(json!({"username": "ann", "password": "secret"}))
        );
    }

    #[tokio::test]
    async fn test_login_without_refresh_keeps_previous_refresh() {
        let store = InMemoryTokenStore::with_tokens(None, Some("R0"));
        let (login, _http) = login(
            ScriptedHttp::replying([ResponseSpec::json_body(200, &json!({"access": "A1"}))]),
            store.clone(),
        );

        login
            .execute(&LoginRequest::new("ann", "secret"))
            .await
            .unwrap();

        assert_eq!(store.pair().await.unwrap(), Some(TokenPair::new("A1", "R0")));
    }

    #[tokio::test]
    async fn test_login_ignores_stale_credential_and_does_not_refresh() {
        let store = InMemoryTokenStore::with_tokens(Some("A0"), Some("R0"));
        let (login, http) = login(
            ScriptedHttp::replying([ResponseSpec::json_body(
                401,
                &json!({"detail": "No active account found"}),
            )]),
            store.clone(),
        );

        let result = login.execute(&LoginRequest::new("ann", "wrong")).await;

        assert!(matches!(result, Err(ref e) if e.is_unauthorized()));
        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].authorization(), None);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_login_rejects_response_without_access() {
        let store = InMemoryTokenStore::new();
        let (login, _http) = login(
            ScriptedHttp::replying([ResponseSpec::json_body(200, &json!({"refresh": "R1"}))]),
            store.clone(),
        );

        let result = login.execute(&LoginRequest::new("ann", "secret")).await;

        assert!(matches!(result, Err(ApplicationError::Decode(_))));
        assert_eq!(store.count().await, 0);
    }
}
