pub mod local;

use async_trait::async_trait;

use crate::errors::StorageError;

/// Blob storage for uploaded images. Paths are relative to the storage root
/// and are what gets persisted on records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Writes `bytes` under `folder` and returns the relative path.
    async fn store(&self, bytes: &[u8], folder: &str, extension: &str) -> Result<String, StorageError>;

    /// Removes a previously stored file. Missing files are not an error.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}
