//! Authenticated HTTP client.
//!
//! Every request goes through the same pipeline:
//!
//! 1. attach `Authorization: Bearer <access>` from the token store, if any;
//! 2. send through the [`HttpClient`] port;
//! 3. on a first 401, obtain a new access token (leading or joining the
//!    single in-flight refresh) and resubmit the request once.
//!
//! A 401 on the resubmission, or any other failure, is returned unchanged.

mod refresh;

use std::sync::Arc;

use parley_domain::{ClientSettings, HttpMethod, RequestSpec, ResponseSpec, TokenKey};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::{RefreshCoordinator, RefreshTicket};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{HttpClient, TokenStore, TokenStoreError};

/// HTTP client that attaches bearer credentials and refreshes them on 401.
///
/// Clones share the transport, the token store and the refresh state, so
/// concurrent callers on clones still trigger at most one refresh.
pub struct AuthenticatedHttpClient<C, S> {
    http: Arc<C>,
    store: Arc<S>,
    settings: Arc<ClientSettings>,
    coordinator: Arc<RefreshCoordinator>,
}

impl<C, S> Clone for AuthenticatedHttpClient<C, S> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            store: Arc::clone(&self.store),
            settings: Arc::clone(&self.settings),
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl<C: HttpClient, S: TokenStore> AuthenticatedHttpClient<C, S> {
    /// Creates a client with its own refresh state.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid.
    pub fn new(http: Arc<C>, store: Arc<S>, settings: ClientSettings) -> ApplicationResult<Self> {
        settings.validate()?;
        Ok(Self {
            http,
            store,
            settings: Arc::new(settings),
            coordinator: Arc::new(RefreshCoordinator::new()),
        })
    }

    /// Client settings.
    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// The token store this client reads and writes.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns true while a token refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.coordinator.is_refreshing()
    }

    /// Number of requests waiting for the in-flight refresh.
    #[must_use]
    pub fn waiting_for_refresh(&self) -> usize {
        self.coordinator.waiting()
    }

    /// Builds a request for an API path relative to the base URL.
    #[must_use]
    pub fn request(&self, method: HttpMethod, path: &str) -> RequestSpec {
        RequestSpec::new(method, self.settings.endpoint(path))
    }

    /// `GET` an API path.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn get(&self, path: &str) -> ApplicationResult<ResponseSpec> {
        self.execute(self.request(HttpMethod::Get, path)).await
    }

    /// `DELETE` an API path.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn delete(&self, path: &str) -> ApplicationResult<ResponseSpec> {
        self.execute(self.request(HttpMethod::Delete, path)).await
    }

    /// `POST` a JSON body to an API path.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Decode`] if the body cannot be encoded,
    /// otherwise see [`Self::execute`].
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApplicationResult<ResponseSpec> {
        self.send_json(HttpMethod::Post, path, body).await
    }

    /// `PUT` a JSON body to an API path.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Decode`] if the body cannot be encoded,
    /// otherwise see [`Self::execute`].
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApplicationResult<ResponseSpec> {
        self.send_json(HttpMethod::Put, path, body).await
    }

    /// `GET` an API path and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Decode`] if the response does not match
    /// `T`, otherwise see [`Self::execute`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApplicationResult<T> {
        let response = self.get(path).await?;
        decode(&response)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> ApplicationResult<ResponseSpec> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApplicationError::Decode(format!("request body: {e}")))?;
        self.execute(self.request(method, path).with_json(body)).await
    }

    /// Sends a request with the stored credential, refreshing it once on 401.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::Status`] for a non-success response that is not
    ///   a first 401, for a 401 on the resubmission, and for a 401 when no
    ///   refresh token is stored (the store is cleared first);
    /// - [`ApplicationError::Refresh`] when the refresh itself failed;
    /// - [`ApplicationError::Http`] for transport failures.
    pub async fn execute(&self, mut request: RequestSpec) -> ApplicationResult<ResponseSpec> {
        self.attach_credential(&mut request).await?;

        let failure = match self.send(&request).await {
            Ok(response) => return Ok(response),
            Err(failure) if failure.is_unauthorized() => failure,
            Err(failure) => return Err(failure),
        };

        let Some(refresh) = self.stored(TokenKey::Refresh).await? else {
            warn!(request_id = %request.id, "authorization failed and no refresh token is stored");
            self.discard_tokens().await;
            return Err(failure);
        };

        let access = match self.coordinator.begin() {
            RefreshTicket::Leader(leader) => {
                let outcome = self.refresh_access_token(&refresh).await;
                let released = leader.finish(&outcome);
                debug!(request_id = %request.id, released, "refresh cycle finished");
                outcome?
            }
            RefreshTicket::Follower(pending) => {
                debug!(request_id = %request.id, "waiting for in-flight token refresh");
                pending.wait().await?
            }
        };

        debug!(request_id = %request.id, "retrying request with refreshed token");
        request.set_bearer(&access);
        self.send(&request).await
    }

    /// Sends a request without credential and without refresh handling.
    ///
    /// Used for the credential exchange endpoints themselves.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::Status`] for non-success responses and
    /// [`ApplicationError::Http`] for transport failures.
    pub async fn execute_public(&self, mut request: RequestSpec) -> ApplicationResult<ResponseSpec> {
        request.clear_authorization();
        self.send(&request).await
    }

    async fn attach_credential(&self, request: &mut RequestSpec) -> Result<(), TokenStoreError> {
        if let Some(access) = self.stored(TokenKey::Access).await? {
            request.set_bearer(&access);
        } else {
            debug!(request_id = %request.id, "no access token stored, sending unauthenticated");
        }
        Ok(())
    }

    async fn send(&self, request: &RequestSpec) -> ApplicationResult<ResponseSpec> {
        debug!(request_id = %request.id, method = %request.method, url = %request.url, "sending request");
        let response = self.http.execute(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApplicationError::from_response(&response))
        }
    }

    /// Reads a token, treating an empty value as absent.
    async fn stored(&self, key: TokenKey) -> Result<Option<String>, TokenStoreError> {
        Ok(self.store.get(key).await?.filter(|t| !t.is_empty()))
    }

    /// Clears both tokens; a store failure is logged, not returned.
    async fn discard_tokens(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to clear stored tokens");
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(response: &ResponseSpec) -> ApplicationResult<T> {
    response
        .json()
        .map_err(|e| ApplicationError::Decode(e.to_string()))
}
