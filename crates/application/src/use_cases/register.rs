//! Register use case.

use parley_domain::{HttpMethod, RegisterRequest, ResponseSpec};
use tracing::info;

use crate::client::AuthenticatedHttpClient;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{HttpClient, TokenStore};

/// Creates a new account.
pub struct Register<C, S> {
    client: AuthenticatedHttpClient<C, S>,
}

impl<C: HttpClient, S: TokenStore> Register<C, S> {
    /// Creates a new `Register` use case.
    #[must_use]
    pub const fn new(client: AuthenticatedHttpClient<C, S>) -> Self {
        Self { client }
    }

    /// Posts the registration payload and returns the backend's response.
    ///
    /// The token store is neither read nor written.
    ///
    /// # Errors
    /// Returns [`ApplicationError::Status`] if the backend rejects the
    /// registration, for example on a duplicate username.
    pub async fn execute(&self, account: &RegisterRequest) -> ApplicationResult<ResponseSpec> {
        let body = serde_json::to_value(account)
            .map_err(|e| ApplicationError::Decode(format!("registration payload: {e}")))?;
        let request = self
            .client
            .request(HttpMethod::Post, &self.client.settings().register_path)
            .with_json(body);

        let response = self.client.execute_public(request).await?;
        info!(username = %account.username, status = response.status, "account registered");
        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::auth::InMemoryTokenStore;
    use crate::use_cases::testing::{ScriptedHttp, settings};

    #[tokio::test]
    async fn test_register_returns_raw_response_and_leaves_store_alone() {
        let http = Arc::new(ScriptedHttp::replying([ResponseSpec::json_body(
            201,
            &json!({"username": "ann", "email": "ann@example.com"}),
        )]));
        let store = InMemoryTokenStore::with_tokens(Some("A0"), None);
        let client =
            AuthenticatedHttpClient::new(Arc::clone(&http), Arc::new(store.clone()), settings())
                .unwrap();

        let response = Register::new(client)
            .execute(&RegisterRequest::new("ann", "ann@example.com", "secret"))
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(
            response.json::<serde_json::Value>().unwrap()["username"],
            "ann"
        );
        let requests = http.requests();
        assert_eq!(requests[0].url, "http://api.test/api/v1/accounts/register/");
        assert_eq!(requests[0].authorization(), None);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_register_conflict_is_a_status_error() {
        let http = Arc::new(ScriptedHttp::replying([ResponseSpec::json_body(
            400,
            &json!({"username": ["A user with that username already exists."]}),
        )]));
        let client =
            AuthenticatedHttpClient::new(http, Arc::new(InMemoryTokenStore::new()), settings())
                .unwrap();

        let result = Register::new(client)
            .execute(&RegisterRequest::new("ann", "", "secret"))
            .await;

        match result {
            Err(ApplicationError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("already exists"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
