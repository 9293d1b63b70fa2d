//! In-memory token storage.
//!
//! This module provides a thread-safe store for the access/refresh pair,
//! suitable for tests and for embedding the client in a long-lived process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parley_domain::TokenKey;
use tokio::sync::RwLock;

use crate::ports::{TokenStore, TokenStoreError};

/// Thread-safe in-memory token store.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<TokenKey, String>>>,
}

impl InMemoryTokenStore {
    /// Create an empty token store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding the given tokens.
    #[must_use]
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        let mut tokens = HashMap::new();
        if let Some(access) = access {
            tokens.insert(TokenKey::Access, access.to_string());
        }
        if let Some(refresh) = refresh {
            tokens.insert(TokenKey::Refresh, refresh.to_string());
        }
        Self {
            tokens: Arc::new(RwLock::new(tokens)),
        }
    }

    /// Get count of stored tokens.
    pub async fn count(&self) -> usize {
        let tokens = self.tokens.read().await;
        tokens.len()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, TokenStoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(&key).cloned())
    }

    async fn set(&self, key: TokenKey, value: &str) -> Result<(), TokenStoreError> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: TokenKey) -> Result<(), TokenStoreError> {
        let mut tokens = self.tokens.write().await;
        tokens.remove(&key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        let mut tokens = self.tokens.write().await;
        tokens.clear();
        Ok(())
    }
}
