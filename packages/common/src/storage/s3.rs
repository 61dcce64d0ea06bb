use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::key::BlobKey;
use super::traits::{BlobStore, StoredObject};

/// Connection parameters for an S3-compatible bucket (AWS, R2, MinIO).
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint; `None` uses the AWS endpoint for `region`.
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub path_style: bool,
}

/// Object store backed by an S3-compatible bucket.
pub struct S3BlobStore {
    bucket: Box<Bucket>,
}

fn backend(err: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(err.to_string())
}

impl S3BlobStore {
    pub fn new(settings: &S3Settings) -> Result<Self, StorageError> {
        let region = match &settings.endpoint {
            Some(endpoint) => Region::Custom {
                region: settings.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => settings.region.parse().map_err(backend)?,
        };
        let credentials = Credentials::new(
            Some(&settings.access_key),
            Some(&settings.secret_key),
            None,
            None,
            None,
        )
        .map_err(backend)?;

        let mut bucket = Bucket::new(&settings.bucket, region, credentials).map_err(backend)?;
        if settings.path_style {
            bucket = bucket.with_path_style();
        }
        Ok(Self { bucket })
    }
}

fn check_status(key: &BlobKey, status: u16) -> Result<(), StorageError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(StorageError::Backend(format!(
            "unexpected status {status} for {key}"
        )))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        key: &BlobKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key.as_str(), data, content_type)
            .await
            .map_err(backend)?;
        check_status(key, response.status_code())
    }

    async fn get(&self, key: &BlobKey) -> Result<Option<StoredObject>, StorageError> {
        let response = self
            .bucket
            .get_object(key.as_str())
            .await
            .map_err(backend)?;
        if response.status_code() == 404 {
            return Ok(None);
        }
        check_status(key, response.status_code())?;

        let content_type = response
            .headers()
            .get("content-type")
            .cloned()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Ok(Some(StoredObject {
            data: response.bytes().to_vec(),
            content_type,
        }))
    }
}
