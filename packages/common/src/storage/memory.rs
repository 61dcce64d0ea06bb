use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::StorageError;
use super::key::BlobKey;
use super::traits::{BlobStore, StoredObject};

/// Process-local object store, used for development and tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Keys currently stored, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &BlobKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects.write().await.insert(
            key.as_str().to_owned(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_owned(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Option<StoredObject>, StorageError> {
        Ok(self.objects.read().await.get(key.as_str()).cloned())
    }
}
