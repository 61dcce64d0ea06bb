//! Staging of uploaded cover images under `tmp/images/`.

use common::storage::{BlobKey, BlobStore};
use tracing::info;
use uuid::Uuid;

use super::conversion::{ImageConverter, SourceImage};
use super::ingest::{STAGING_PREFIX, public_url};
use crate::error::AppError;

/// Extensions accepted for upload, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Returns the lowercase extension of `file_name` if it is allowed.
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

pub struct ImageStagingService<'a> {
    pub store: &'a dyn BlobStore,
    pub converter: &'a dyn ImageConverter,
    pub public_base_url: &'a str,
    pub max_size: u64,
}

impl ImageStagingService<'_> {
    /// Convert and store an upload, returning the staged object's public URL.
    pub async fn stage(&self, file_name: &str, data: Vec<u8>) -> Result<String, AppError> {
        let ext = allowed_extension(file_name).ok_or_else(|| {
            AppError::Validation(format!(
                "Only {} images are accepted",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;
        if data.is_empty() {
            return Err(AppError::Validation("Image file is empty".into()));
        }
        if data.len() as u64 > self.max_size {
            return Err(AppError::Validation(format!(
                "Image exceeds the {} byte limit",
                self.max_size
            )));
        }

        let content_type = mime_guess::from_ext(&ext)
            .first_or_octet_stream()
            .to_string();
        let converted = self
            .converter
            .convert(SourceImage {
                file_name: file_name.to_owned(),
                content_type,
                data,
            })
            .await?;

        let key = BlobKey::new(format!(
            "{STAGING_PREFIX}{}.{}",
            Uuid::new_v4(),
            converted.extension
        ))
        .map_err(|e| AppError::Internal(e.to_string()))?;

        self.store
            .put(&key, &converted.data, &converted.content_type)
            .await?;
        info!(key = %key, size = converted.data.len(), "Staged image");

        Ok(public_url(self.public_base_url, &key))
    }
}
