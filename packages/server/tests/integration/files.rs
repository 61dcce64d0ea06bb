use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn created_cover_url_is_served() {
    let app = TestApp::spawn().await;
    let staged = app.stage_image("served.webp", b"RIFFWEBP").await;

    let id = app
        .create_sheet(
            &app.token(1),
            json!({ "id": "served", "title": "T", "coverImage": staged }),
            json!({}),
        )
        .await;
    let sheet = app.get_without_token(&routes::sheet(&id)).await;
    let cover = sheet.body["coverImage"].as_str().unwrap();

    let res = app.fetch(cover).await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.headers()["content-type"], "image/webp");
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"RIFFWEBP");
}

#[tokio::test]
async fn uploaded_image_url_is_served() {
    let app = TestApp::spawn().await;
    let upload = app
        .upload_with_token(routes::IMAGES, "cover.png", b"png".to_vec(), &app.token(1))
        .await;
    assert_eq!(upload.status, 200, "{}", upload.text);

    let res = app.fetch(upload.body["coverImage"].as_str().unwrap()).await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"png");
}

#[tokio::test]
async fn score_blobs_are_not_exposed() {
    let app = TestApp::spawn().await;
    let id = app
        .create_sheet(&app.token(1), json!({ "title": "T" }), json!({ "key": "C" }))
        .await;
    assert!(app.blob(&format!("sheets/{id}.json")).await.is_some());

    let res = app
        .fetch(&format!("{}/sheets/{id}.json", app.public_base_url))
        .await;
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn missing_or_malformed_keys_are_not_found() {
    let app = TestApp::spawn().await;
    for key in ["images/nope.webp", "images//a.webp", "tmp/images/../x"] {
        let res = app
            .fetch(&format!("{}/{key}", app.public_base_url))
            .await;
        assert_eq!(res.status().as_u16(), 404, "{key}");
    }
}
