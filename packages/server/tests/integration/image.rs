use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use server::services::conversion::{
    ConversionError, ConvertedImage, ImageConverter, SourceImage,
};

use crate::common::{TestApp, routes};

/// Stands in for the conversion service.
struct FakeConverter {
    reject_with: Option<u16>,
}

#[async_trait]
impl ImageConverter for FakeConverter {
    async fn convert(&self, image: SourceImage) -> Result<ConvertedImage, ConversionError> {
        if let Some(status) = self.reject_with {
            return Err(ConversionError::Rejected {
                status,
                body: "rejected".into(),
            });
        }
        let mut data = b"WEBP:".to_vec();
        data.extend(image.data);
        Ok(ConvertedImage {
            data,
            content_type: "image/webp".into(),
            extension: "webp".into(),
        })
    }
}

#[tokio::test]
async fn upload_is_converted_and_staged() {
    let app = TestApp::spawn_with_converter(Arc::new(FakeConverter { reject_with: None })).await;

    let res = app
        .upload_with_token(routes::IMAGES, "cover.PNG", b"png".to_vec(), &app.token(1))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let url = res.body["coverImage"].as_str().unwrap();
    let prefix = format!("{}/tmp/images/", app.public_base_url);
    assert!(url.starts_with(&prefix), "{url}");
    assert!(url.ends_with(".webp"));

    let key = &url[app.public_base_url.len() + 1..];
    assert_eq!(app.blob(key).await.unwrap(), b"WEBP:png");
}

#[tokio::test]
async fn staged_upload_feeds_sheet_creation() {
    let app = TestApp::spawn().await;
    let token = app.token(1);

    let upload = app
        .upload_with_token(routes::IMAGES, "cover.jpg", b"jpeg".to_vec(), &token)
        .await;
    assert_eq!(upload.status, 200);
    let cover = upload.body["coverImage"].clone();

    let id = app
        .create_sheet(
            &token,
            json!({ "id": "from-upload", "title": "T", "coverImage": cover }),
            json!({}),
        )
        .await;
    let sheet = app.get_without_token(&routes::sheet(&id)).await;
    assert_eq!(
        sheet.body["coverImage"],
        format!("{}/images/from-upload.jpg", app.public_base_url)
    );
}

#[tokio::test]
async fn unsupported_extension_is_rejected() {
    let app = TestApp::spawn().await;
    let res = app
        .upload_with_token(routes::IMAGES, "cover.bmp", b"bmp".to_vec(), &app.token(1))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
    assert!(app.blobs.is_empty().await);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = TestApp::spawn().await;
    let res = app
        .upload_with_token(routes::IMAGES, "big.png", vec![0; 64 * 1024 + 1], &app.token(1))
        .await;
    assert_eq!(res.status, 400);
    assert!(app.blobs.is_empty().await);
}

#[tokio::test]
async fn conversion_failure_status_is_propagated() {
    let app =
        TestApp::spawn_with_converter(Arc::new(FakeConverter { reject_with: Some(415) })).await;

    let res = app
        .upload_with_token(routes::IMAGES, "cover.gif", b"gif".to_vec(), &app.token(1))
        .await;
    assert_eq!(res.status, 415);
    assert_eq!(res.code(), "UPSTREAM_ERROR");
    assert!(app.blobs.is_empty().await);
}

#[tokio::test]
async fn upload_requires_token() {
    let app = TestApp::spawn().await;
    let part = reqwest::multipart::Part::bytes(b"png".to_vec()).file_name("a.png");
    let res = app
        .client
        .post(format!("http://{}{}", app.addr, routes::IMAGES))
        .multipart(reqwest::multipart::Form::new().part("file", part))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
}
