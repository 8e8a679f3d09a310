//! Cart snapshot storage.

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tokio::{fs, sync::Mutex};

/// Snapshot persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO failure reading or writing the snapshot
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot payload failed to serialize
    #[error("snapshot codec: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Where the cart snapshot lives between runs.
#[automock]
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Read the persisted snapshot, if one exists.
    async fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the persisted snapshot.
    async fn write(&self, snapshot: &str) -> Result<(), StorageError>;
}

/// Snapshot kept in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStorage {
    path: PathBuf,
}

impl FileSnapshotStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotStorage for FileSnapshotStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, snapshot: &str) -> Result<(), StorageError> {
        fs::write(&self.path, snapshot).await?;

        Ok(())
    }
}

/// Snapshot kept in memory, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySnapshotStorage {
    snapshot: Mutex<Option<String>>,
}

#[async_trait]
impl SnapshotStorage for MemorySnapshotStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn write(&self, snapshot: &str) -> Result<(), StorageError> {
        *self.snapshot.lock().await = Some(snapshot.to_string());

        Ok(())
    }
}
