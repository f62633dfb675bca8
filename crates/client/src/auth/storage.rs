//! Token Storage

use std::{io, path::PathBuf};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tokio::{fs, sync::Mutex};
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("token storage I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Where the session token survives restarts.
#[automock]
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// The stored token, or `None` when nothing is stored.
    async fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored token. Readers see either the old token or the new
    /// one, never a partial write.
    async fn write(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the stored token. Removing nothing is not an error.
    async fn delete(&self) -> Result<(), StorageError>;
}

/// Token kept in a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling of the token file, so the final rename stays on one filesystem.
    fn staging_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();

        path.push(".tmp");

        PathBuf::from(path)
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();

                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn write(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let staging = self.staging_path();

        fs::write(&staging, token).await?;

        if let Err(error) = fs::rename(&staging, &self.path).await {
            if let Err(cleanup) = fs::remove_file(&staging).await {
                warn!(path = %staging.display(), "failed to remove staged token: {cleanup}");
            }

            return Err(error.into());
        }

        Ok(())
    }

    async fn delete(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path).await {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}

/// Token kept for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.lock().await.clone())
    }

    async fn write(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().await = Some(token.to_string());

        Ok(())
    }

    async fn delete(&self) -> Result<(), StorageError> {
        *self.token.lock().await = None;

        Ok(())
    }
}
