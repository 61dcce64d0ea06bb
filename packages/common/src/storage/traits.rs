use async_trait::async_trait;

use super::error::StorageError;
use super::key::BlobKey;

/// Bytes of a stored object together with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Key-addressed object storage.
///
/// Every call is independent; no backend offers transactions spanning
/// several keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, replacing any previous object.
    async fn put(&self, key: &BlobKey, data: &[u8], content_type: &str)
    -> Result<(), StorageError>;

    /// Fetch the object under `key`, or `None` when it does not exist.
    async fn get(&self, key: &BlobKey) -> Result<Option<StoredObject>, StorageError>;
}
