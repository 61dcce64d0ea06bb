use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::key::BlobKey;
use super::traits::{BlobStore, StoredObject};

/// Filesystem-backed object store.
///
/// Each key maps onto `{base_path}/{key}`. Content types are not persisted;
/// they are derived from the key's extension on read.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    fn object_path(&self, key: &BlobKey) -> PathBuf {
        let mut path = self.base_path.clone();
        path.extend(key.segments());
        path
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

fn content_type_for(key: &BlobKey) -> String {
    mime_guess::from_path(key.as_str())
        .first_or_octet_stream()
        .to_string()
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(
        &self,
        key: &BlobKey,
        data: &[u8],
        _content_type: &str,
    ) -> Result<(), StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let object_path = self.object_path(key);
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Rename keeps readers from ever observing a half-written object.
        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(key = %key, size = data.len(), "Stored object");
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Option<StoredObject>, StorageError> {
        match fs::read(self.object_path(key)).await {
            Ok(data) => Ok(Some(StoredObject {
                data,
                content_type: content_type_for(key),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
