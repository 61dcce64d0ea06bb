//! Client for the external image-to-WebP conversion service.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument};

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The service answered with a non-success status.
    #[error("conversion service returned {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("conversion service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// An uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Result of a conversion: the bytes to stage and how to label them.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    pub data: Vec<u8>,
    pub content_type: String,
    pub extension: String,
}

#[async_trait]
pub trait ImageConverter: Send + Sync {
    async fn convert(&self, image: SourceImage) -> Result<ConvertedImage, ConversionError>;
}

/// Sends images to `{endpoint}/webp` as multipart field `image`.
pub struct WebpConverter {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl WebpConverter {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_token,
        }
    }

    fn url(&self) -> String {
        format!("{}/webp", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl ImageConverter for WebpConverter {
    #[instrument(skip(self, image), fields(file_name = %image.file_name, size = image.data.len()))]
    async fn convert(&self, image: SourceImage) -> Result<ConvertedImage, ConversionError> {
        let part = Part::bytes(image.data)
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;
        let form = Form::new().part("image", part);

        let mut request = self.client.post(self.url()).multipart(form);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConversionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let data = response.bytes().await?.to_vec();
        debug!(converted_size = data.len(), "Image converted");
        Ok(ConvertedImage {
            data,
            content_type: "image/webp".into(),
            extension: "webp".into(),
        })
    }
}

/// Stages images unchanged. Used when no conversion service is configured.
pub struct Passthrough;

#[async_trait]
impl ImageConverter for Passthrough {
    async fn convert(&self, image: SourceImage) -> Result<ConvertedImage, ConversionError> {
        let extension = image
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".into());
        Ok(ConvertedImage {
            data: image.data,
            content_type: image.content_type,
            extension,
        })
    }
}
