//! Logout use case.

use tracing::info;

use crate::client::AuthenticatedHttpClient;
use crate::error::ApplicationResult;
use crate::ports::{HttpClient, TokenStore};

/// Forgets the stored tokens. No request is sent.
pub struct Logout<C, S> {
    client: AuthenticatedHttpClient<C, S>,
}

impl<C: HttpClient, S: TokenStore> Logout<C, S> {
    /// Creates a new `Logout` use case.
    #[must_use]
    pub const fn new(client: AuthenticatedHttpClient<C, S>) -> Self {
        Self { client }
    }

    /// Removes both tokens from the client's store.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub async fn execute(&self) -> ApplicationResult<()> {
        self.client.store().clear().await?;
        info!("stored tokens cleared");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::InMemoryTokenStore;
    use crate::use_cases::testing::{ScriptedHttp, settings};

    fn logout(store: &InMemoryTokenStore) -> (Logout<ScriptedHttp, InMemoryTokenStore>, Arc<ScriptedHttp>) {
        let http = Arc::new(ScriptedHttp::default());
        let client =
            AuthenticatedHttpClient::new(Arc::clone(&http), Arc::new(store.clone()), settings())
                .unwrap();
        (Logout::new(client), http)
    }

    #[tokio::test]
    async fn test_logout_clears_tokens_without_a_request() {
        let store = InMemoryTokenStore::with_tokens(Some("A1"), Some("R1"));
        let (logout, http) = logout(&store);

        logout.execute().await.unwrap();

        assert_eq!(store.count().await, 0);
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_logout_when_signed_out() {
        let store = InMemoryTokenStore::new();
        let (logout, _http) = logout(&store);
        logout.execute().await.unwrap();
        assert_eq!(store.count().await, 0);
    }
}
