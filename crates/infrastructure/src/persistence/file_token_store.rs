//! File-based token store.
//!
//! Tokens are kept in a single JSON document, by default
//! `<config dir>/parley/tokens.json`, so a session survives restarts of
//! the command line client.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parley_application::ports::{TokenStore, TokenStoreError};
use parley_domain::TokenKey;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

const SCHEMA_VERSION: u32 = 1;

/// On-disk layout:
/// ```json
/// {
///   "schema_version": 1,
///   "tokens": {
///     "access": "eyJ...",
///     "refresh": "eyJ..."
///   },
///   "updated_at": "2026-01-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
struct TokenDocument {
    schema_version: u32,
    #[serde(default)]
    tokens: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl Default for TokenDocument {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tokens: BTreeMap::new(),
            updated_at: None,
        }
    }
}

/// Token store persisted to a JSON file.
///
/// A missing file reads as an empty store. Writes within one process are
/// serialized; the file is replaced atomically.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    /// Creates a store backed by `path`. Nothing is read until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default token file location, `None` if the platform has no config
    /// directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("parley").join("tokens.json"))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<TokenDocument, TokenStoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(TokenDocument::default()),
            Err(e) => return Err(e.into()),
        };

        let document: TokenDocument = from_json_bytes(&content)
            .map_err(|e| TokenStoreError::Serialization(e.to_string()))?;

        if document.schema_version > SCHEMA_VERSION {
            return Err(TokenStoreError::Serialization(format!(
                "unsupported token file schema version {} (expected {SCHEMA_VERSION})",
                document.schema_version
            )));
        }
        Ok(document)
    }

    async fn save(&self, mut document: TokenDocument) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        document.schema_version = SCHEMA_VERSION;
        document.updated_at = Some(Utc::now());
        let content = to_json_stable_bytes(&document)
            .map_err(|e| TokenStoreError::Serialization(e.to_string()))?;

        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, &content).await?;
        restrict_permissions(&staging).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        debug!(path = %self.path.display(), tokens = document.tokens.len(), "token file written");
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, TokenStoreError> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        Ok(document.tokens.get(key.as_str()).cloned())
    }

    async fn set(&self, key: TokenKey, value: &str) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        document
            .tokens
            .insert(key.as_str().to_string(), value.to_string());
        self.save(document).await
    }

    async fn remove(&self, key: TokenKey) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        if document.tokens.remove(key.as_str()).is_none() {
            return Ok(());
        }
        self.save(document).await
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "token file removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use parley_domain::TokenPair;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileTokenStore {
        FileTokenStore::new(dir.path().join("parley").join("tokens.json"))
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.get(TokenKey::Access).await.unwrap(), None);
        assert_eq!(store.pair().await.unwrap(), None);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_tokens_survive_a_new_instance() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(TokenKey::Access, "A1").await.unwrap();
        store.set(TokenKey::Refresh, "R1").await.unwrap();

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.pair().await.unwrap(),
            Some(TokenPair::new("A1", "R1"))
        );
    }

    #[tokio::test]
    async fn test_document_layout() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(TokenKey::Refresh, "R1").await.unwrap();
        store.set(TokenKey::Access, "A1").await.unwrap();

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["schema_version"], 1);
        assert_eq!(
            value["tokens"],
            serde_json::json!({"access": "A1", "refresh": "R1"})
        );
        assert!(value["updated_at"].is_string());
        assert!(raw.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(TokenKey::Access, "A1").await.unwrap();
        store.set(TokenKey::Refresh, "R1").await.unwrap();

        store.remove(TokenKey::Access).await.unwrap();
        assert_eq!(store.get(TokenKey::Access).await.unwrap(), None);
        assert_eq!(
            store.get(TokenKey::Refresh).await.unwrap().as_deref(),
            Some("R1")
        );

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        tokio::fs::create_dir_all(store.path().parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(store.path(), b"not json").await.unwrap();

        let result = store.get(TokenKey::Access).await;
        assert!(matches!(result, Err(TokenStoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_newer_schema_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        tokio::fs::create_dir_all(store.path().parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(store.path(), br#"{"schema_version": 2, "tokens": {}}"#)
            .await
            .unwrap();

        let result = store.get(TokenKey::Access).await;
        assert!(matches!(result, Err(TokenStoreError::Serialization(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(TokenKey::Access, "A1").await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = FileTokenStore::default_path() {
            assert!(path.ends_with("parley/tokens.json"));
        }
    }
}
