//! Token store port
//!
//! Defines the persistence boundary for the access/refresh token pair.

use async_trait::async_trait;
use parley_domain::{TokenKey, TokenPair};

/// Errors that can occur during token store operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Key-value store holding the current tokens.
///
/// No expiry or encryption happens at this layer.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Reads a token. Returns `None` when the key is absent.
    async fn get(&self, key: TokenKey) -> Result<Option<String>, TokenStoreError>;

    /// Writes a token, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the value cannot be persisted.
    async fn set(&self, key: TokenKey, value: &str) -> Result<(), TokenStoreError>;

    /// Removes a token. Removing an absent key is not an error.
    async fn remove(&self, key: TokenKey) -> Result<(), TokenStoreError>;

    /// Removes both tokens.
    async fn clear(&self) -> Result<(), TokenStoreError> {
        for key in TokenKey::ALL {
            self.remove(key).await?;
        }
        Ok(())
    }

    /// Reads both tokens. Returns `None` without an access token.
    async fn pair(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        let Some(access) = self.get(TokenKey::Access).await? else {
            return Ok(None);
        };
        let refresh = self.get(TokenKey::Refresh).await?;
        Ok(Some(TokenPair { access, refresh }))
    }
}
