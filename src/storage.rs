//! Persistent key-value storage trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

/// Storage keys used by the session stores.
///
/// Key names match the persisted data of existing installs, so they must not
/// be renamed.
pub mod keys {
    /// Bearer token of the authenticated session
    pub const TOKEN: &str = "token";
    /// Cached user profile, JSON-encoded
    pub const USER: &str = "user";
    /// Active role of the session
    pub const ACTIVE_ROLE: &str = "activeRole";
    /// In-progress property listing draft, JSON-encoded
    pub const PROPERTY_DRAFT: &str = "propertyFormData";
}

/// String-keyed persistent store (platform preferences, disk, or memory)
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Backend(Box<str>),
}

impl StorageError {
    /// Message suitable for the last-persistence-error diagnostic signal
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// In-memory store for testing
#[derive(Default)]
pub struct InMemoryStore {
    data: std::sync::RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored keys, for assertions
    pub fn keys(&self) -> Vec<String> {
        self.data
            .read()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Backend(e.to_string().into()))?;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Backend(e.to_string().into()))?;
        data.insert(key.into(), value.into());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Backend(e.to_string().into()))?;
        data.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Backend(e.to_string().into()))?;
        data.clear();
        Ok(())
    }
}

/// File-backed store: a single JSON object map rewritten on every mutation.
///
/// Values are small (a token and two JSON blobs), so the whole-map rewrite is
/// acceptable. Not safe for concurrent writers across processes.
pub struct JsonFileStore {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Backend(e.to_string().into())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(map)
            .map_err(|e| StorageError::Backend(e.to_string().into()))?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        map.insert(key.into(), value.into());
        self.save(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        if map.remove(key).is_some() {
            self.save(&map).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
