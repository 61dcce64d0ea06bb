use serde_json::json;

use crate::common::{TestApp, names, routes};

#[tokio::test]
async fn like_is_idempotent() {
    let app = TestApp::spawn().await;
    let id = app.create_sheet(&app.token(1), json!({ "title": "T" }), json!({})).await;
    let fan = app.token(2);

    for _ in 0..2 {
        let res = app.post_with_token(&routes::like(&id), &json!({}), &fan).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["liked"], true);
    }

    let status = app.get_with_token(&routes::like_status(&id), &fan).await;
    assert_eq!(status.body["liked"], true);

    let liked = app.get_with_token(routes::LIKED, &fan).await;
    assert_eq!(liked.body["sheets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unlike_is_idempotent_and_never_not_found() {
    let app = TestApp::spawn().await;
    let id = app.create_sheet(&app.token(1), json!({ "title": "T" }), json!({})).await;
    let fan = app.token(2);
    app.post_with_token(&routes::like(&id), &json!({}), &fan).await;

    for _ in 0..2 {
        let res = app.delete_with_token(&routes::like(&id), &fan).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["liked"], false);
    }
    let status = app.get_with_token(&routes::like_status(&id), &fan).await;
    assert_eq!(status.body["liked"], false);

    let res = app.delete_with_token(&routes::like("no-such-sheet"), &fan).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["liked"], false);
}

#[tokio::test]
async fn like_and_status_need_an_existing_sheet() {
    let app = TestApp::spawn().await;
    let token = app.token(1);

    let res = app.post_with_token(&routes::like("missing"), &json!({}), &token).await;
    assert_eq!(res.status, 404);
    let res = app.get_with_token(&routes::like_status("missing"), &token).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn likes_are_per_user() {
    let app = TestApp::spawn().await;
    let id = app.create_sheet(&app.token(1), json!({ "title": "T" }), json!({})).await;

    app.post_with_token(&routes::like(&id), &json!({}), &app.token(2)).await;

    let other = app.get_with_token(&routes::like_status(&id), &app.token(3)).await;
    assert_eq!(other.body["liked"], false);
}

#[tokio::test]
async fn liked_list_is_most_recent_first_with_artists() {
    let app = TestApp::spawn().await;
    let owner = app.token(1);
    let first = app
        .create_sheet(
            &owner,
            json!({ "title": "First", "singers": [{ "name": "A" }] }),
            json!({}),
        )
        .await;
    let second = app.create_sheet(&owner, json!({ "title": "Second" }), json!({})).await;

    let fan = app.token(2);
    assert!(app.get_with_token(routes::LIKED, &fan).await.body["sheets"]
        .as_array()
        .unwrap()
        .is_empty());

    app.post_with_token(&routes::like(&second), &json!({}), &fan).await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    app.post_with_token(&routes::like(&first), &json!({}), &fan).await;

    let res = app.get_with_token(routes::LIKED, &fan).await;
    assert_eq!(res.status, 200);
    let sheets = res.body["sheets"].as_array().unwrap();
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0]["id"], first.as_str());
    assert_eq!(names(&sheets[0]["singers"]), ["A"]);
    assert_eq!(sheets[1]["id"], second.as_str());
}

#[tokio::test]
async fn like_routes_require_token() {
    let app = TestApp::spawn().await;
    let res = app.post_without_token(&routes::like("x"), &json!({})).await;
    assert_eq!(res.status, 401);
    let res = app.get_without_token(routes::LIKED).await;
    assert_eq!(res.status, 401);
}
