//! Profile use cases for the signed-in account.

use parley_domain::{Profile, ProfileUpdate};

use crate::client::{AuthenticatedHttpClient, decode};
use crate::error::ApplicationResult;
use crate::ports::{HttpClient, TokenStore};

/// Fetches the signed-in account's profile.
pub struct GetProfile<C, S> {
    client: AuthenticatedHttpClient<C, S>,
}

impl<C: HttpClient, S: TokenStore> GetProfile<C, S> {
    /// Creates a new `GetProfile` use case.
    #[must_use]
    pub const fn new(client: AuthenticatedHttpClient<C, S>) -> Self {
        Self { client }
    }

    /// # Errors
    /// Any error of the authenticated pipeline, or
    /// [`crate::ApplicationError::Decode`] for an unexpected body.
    pub async fn execute(&self) -> ApplicationResult<Profile> {
        self.client
            .get_json(&self.client.settings().profile_path)
            .await
    }
}

/// Applies a partial profile update.
pub struct UpdateProfile<C, S> {
    client: AuthenticatedHttpClient<C, S>,
}

impl<C: HttpClient, S: TokenStore> UpdateProfile<C, S> {
    /// Creates a new `UpdateProfile` use case.
    #[must_use]
    pub const fn new(client: AuthenticatedHttpClient<C, S>) -> Self {
        Self { client }
    }

    /// Sends the changed fields and returns the profile as stored by the
    /// backend. An empty update only fetches the current profile.
    ///
    /// # Errors
    /// Any error of the authenticated pipeline, or
    /// [`crate::ApplicationError::Decode`] for an unexpected body.
    pub async fn execute(&self, update: &ProfileUpdate) -> ApplicationResult<Profile> {
        let path = &self.client.settings().profile_path;
        if update.is_empty() {
            return self.client.get_json(path).await;
        }
        let response = self.client.put_json(path, update).await?;
        decode(&response)
    }
}
