//! Storage abstraction for generated packages and the sync marker

use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract storage provider trait
///
/// Paths are relative to the provider's root.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Read data from the given path
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Replace the data at the given path. Readers never observe a partial write.
    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Check if a path exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Last modification time, `None` if the path does not exist
    async fn modified(&self, path: &str) -> StorageResult<Option<DateTime<Utc>>>;
}

/// Local filesystem storage provider
pub struct LocalStorage {
    root: std::path::PathBuf,
}

impl LocalStorage {
    /// Create a new local storage provider with the given root directory
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Safely resolve a path, preventing path traversal attacks
    fn full_path(&self, path: &str) -> StorageResult<std::path::PathBuf> {
        use std::path::Component;

        // Normalize path components, rejecting any that escape the root
        let mut normalized = std::path::PathBuf::new();
        for component in std::path::Path::new(path).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {} // Ignore "."
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(StorageError::BackendError(
                        "Path traversal attempt detected".to_string(),
                    ));
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(StorageError::BackendError(format!("Empty path: {path:?}")));
        }

        Ok(self.root.join(normalized))
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        tokio::fs::read(full_path)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io(path, e))?;
        }

        // Write to a temp file in the same directory, then rename over the target
        let file_name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path =
            full_path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&temp_path, &data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::from_io(path, e));
        }
        if let Err(e) = tokio::fs::rename(&temp_path, &full_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::from_io(path, e));
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full_path = self.full_path(path)?;
        tokio::fs::try_exists(full_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }

    async fn modified(&self, path: &str) -> StorageResult<Option<DateTime<Utc>>> {
        let full_path = self.full_path(path)?;
        match tokio::fs::metadata(full_path).await {
            Ok(metadata) => {
                let modified = metadata
                    .modified()
                    .map_err(|e| StorageError::from_io(path, e))?;
                Ok(Some(DateTime::<Utc>::from(modified)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from_io(path, e)),
        }
    }
}

/// In-memory storage provider (for testing)
#[derive(Default)]
pub struct MemoryStorage {
    data: std::sync::RwLock<std::collections::HashMap<String, (Vec<u8>, DateTime<Utc>)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths currently stored, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .data
            .read()
            .map(|data| data.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    /// Remove a path, returning whether it existed
    pub fn remove(&self, path: &str) -> bool {
        self.data
            .write()
            .map(|mut data| data.remove(path).is_some())
            .unwrap_or(false)
    }

    fn poisoned() -> StorageError {
        StorageError::BackendError("memory storage lock poisoned".to_string())
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.data
            .read()
            .map_err(|_| Self::poisoned())?
            .get(path)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        self.data
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(path.to_string(), (data, Utc::now()));
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self
            .data
            .read()
            .map_err(|_| Self::poisoned())?
            .contains_key(path))
    }

    async fn modified(&self, path: &str) -> StorageResult<Option<DateTime<Utc>>> {
        Ok(self
            .data
            .read()
            .map_err(|_| Self::poisoned())?
            .get(path)
            .map(|(_, modified)| *modified))
    }
}
