use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{errors::StorageError, storage::MediaStorage};

/// Stores uploads on the local disk under a root directory that is also
/// served as static files.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalMediaStorage { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins a stored relative path onto the root, refusing anything that
    /// could escape it.
    fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let path = Path::new(relative);
        let safe = !relative.is_empty()
            && path.components().all(|c| matches!(c, Component::Normal(_)));

        if !safe {
            return Err(StorageError::InvalidPath(relative.to_string()));
        }

        Ok(self.root.join(path))
    }
}

fn safe_segment(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(&self, bytes: &[u8], folder: &str, extension: &str) -> Result<String, StorageError> {
        if !safe_segment(folder) {
            return Err(StorageError::InvalidPath(folder.to_string()));
        }
        if !safe_segment(extension) {
            return Err(StorageError::InvalidPath(extension.to_string()));
        }

        let relative = format!("{}/{}.{}", folder, Uuid::new_v4().simple(), extension);
        let target = self.resolve(&relative)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::Write)?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(StorageError::Write)?;

        info!(path = %relative, size = bytes.len(), "Stored upload");
        Ok(relative)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let target = self.resolve(path)?;

        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                info!(path = %path, "Deleted upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path, "Upload already gone");
                Ok(())
            }
            Err(e) => Err(StorageError::Delete(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> LocalMediaStorage {
        let root = std::env::temp_dir().join(format!("portfolio-storage-{}", Uuid::new_v4()));
        LocalMediaStorage::new(root)
    }

    #[tokio::test]
    async fn stores_under_folder_and_deletes() {
        let storage = temp_storage();

        let path = storage.store(b"image-bytes", "blog-images", "png").await.unwrap();
        assert!(path.starts_with("blog-images/"));
        assert!(path.ends_with(".png"));

        let on_disk = storage.root().join(&path);
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), b"image-bytes");

        storage.delete(&path).await.unwrap();
        assert!(!on_disk.exists());

        let _ = tokio::fs::remove_dir_all(storage.root()).await;
    }

    #[tokio::test]
    async fn deleting_a_missing_file_succeeds() {
        let storage = temp_storage();
        assert!(storage.delete("blog-images/missing.png").await.is_ok());
    }

    #[tokio::test]
    async fn rejects_paths_outside_the_root() {
        let storage = temp_storage();
        assert!(matches!(
            storage.delete("../etc/passwd").await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.delete("/etc/passwd").await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(storage.store(b"x", "../up", "png").await.is_err());
    }
}
