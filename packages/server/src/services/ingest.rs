//! Promotion of staged cover images into their permanent location.
//!
//! Uploaded images first land under `tmp/images/`. A sheet only ever refers
//! to a promoted copy. Staged objects are left in place for the retention
//! policy of the bucket to collect.

use common::storage::{BlobKey, BlobStore, ContentHash, StorageError};
use tracing::debug;

/// Key prefix of staged uploads.
pub const STAGING_PREFIX: &str = "tmp/images/";

/// Key prefix of promoted images.
pub const PERMANENT_PREFIX: &str = "images/";

const DEFAULT_EXTENSION: &str = "webp";

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid cover image reference: {0}")]
    InvalidReference(String),
    #[error("staged image not found: {0}")]
    NotStaged(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// How the permanent key of a promoted image is derived.
#[derive(Debug, Clone, Copy)]
pub enum PermanentName<'a> {
    /// `images/{sheet_id}.{ext}`
    Sheet(&'a str),
    /// `images/{sha256}.{ext}`, so a replaced cover gets a fresh URL.
    ContentHash,
}

#[derive(Debug, Clone)]
pub struct PromotedImage {
    pub key: BlobKey,
    pub url: String,
}

/// Extract the staged object key from a cover image URL or key.
///
/// Everything from the `tmp/images/` marker onwards is the key; a query
/// string or fragment is dropped.
pub fn staged_key(reference: &str) -> Result<BlobKey, IngestError> {
    let invalid = || IngestError::InvalidReference(reference.to_owned());

    let start = reference.find(STAGING_PREFIX).ok_or_else(invalid)?;
    let key = reference[start..]
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    BlobKey::new(key).map_err(|_| invalid())
}

/// Externally resolvable URL of `key`.
pub fn public_url(base_url: &str, key: &BlobKey) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

fn permanent_extension(staged: &BlobKey) -> String {
    staged
        .extension()
        .filter(|ext| ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Copies staged images into the permanent namespace.
pub struct ImageIngestor<'a> {
    store: &'a dyn BlobStore,
    public_base_url: &'a str,
}

impl<'a> ImageIngestor<'a> {
    pub fn new(store: &'a dyn BlobStore, public_base_url: &'a str) -> Self {
        Self {
            store,
            public_base_url,
        }
    }

    /// Promote the image referenced by `reference` and return its new URL.
    pub async fn promote(
        &self,
        reference: &str,
        name: PermanentName<'_>,
    ) -> Result<PromotedImage, IngestError> {
        let staged = staged_key(reference)?;

        let object = self
            .store
            .get(&staged)
            .await?
            .ok_or_else(|| IngestError::NotStaged(staged.to_string()))?;

        let ext = permanent_extension(&staged);
        let stem = match name {
            PermanentName::Sheet(sheet_id) => sheet_id.to_owned(),
            PermanentName::ContentHash => ContentHash::compute(&object.data).to_hex(),
        };
        let key = BlobKey::new(format!("{PERMANENT_PREFIX}{stem}.{ext}"))
            .map_err(|_| IngestError::InvalidReference(reference.to_owned()))?;

        self.store
            .put(&key, &object.data, &object.content_type)
            .await?;
        debug!(from = %staged, to = %key, "Promoted staged image");

        let url = public_url(self.public_base_url, &key);
        Ok(PromotedImage { key, url })
    }
}
