use futures::future::join_all;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use server::entity::{artist, sheet_artist};
use server::services::artist::{ArtistCredit, ArtistResolver};

use crate::common::{TestApp, routes};

#[tokio::test]
async fn same_name_resolves_to_one_artist() {
    let app = TestApp::spawn().await;
    let token = app.token(1);
    for title in ["Song A", "Song B"] {
        app.create_sheet(
            &token,
            json!({ "title": title, "singers": [{ "name": "A" }], "composers": [{ "name": "A" }] }),
            json!({}),
        )
        .await;
    }

    let count = artist::Entity::find()
        .filter(artist::Column::Name.eq("A"))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn names_are_case_sensitive() {
    let app = TestApp::spawn().await;
    let resolver = ArtistResolver::new(&app.db);

    let lower = resolver.resolve("artist").await.unwrap();
    let upper = resolver.resolve("Artist").await.unwrap();
    assert_ne!(lower, upper);
    assert_eq!(resolver.resolve("artist").await.unwrap(), lower);
}

#[tokio::test]
async fn concurrent_resolves_converge_on_one_row() {
    let app = TestApp::spawn().await;

    let ids = join_all((0..8).map(|_| {
        let db = app.db.clone();
        async move { ArtistResolver::new(&db).resolve("Newcomer").await }
    }))
    .await;

    let first = *ids[0].as_ref().unwrap();
    for id in &ids {
        assert_eq!(*id.as_ref().unwrap(), first);
    }
    let count = artist::Entity::find()
        .filter(artist::Column::Name.eq("Newcomer"))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn relink_twice_leaves_the_same_links() {
    let app = TestApp::spawn().await;
    let id = app.create_sheet(&app.token(1), json!({ "title": "T" }), json!({})).await;
    let resolver = ArtistResolver::new(&app.db);
    let credits = ArtistCredit::from_lists(&["A", "A"], &["B"]);

    assert_eq!(resolver.relink(&id, &credits).await.unwrap(), 2);
    assert_eq!(resolver.relink(&id, &credits).await.unwrap(), 2);

    let links = sheet_artist::Entity::find()
        .filter(sheet_artist::Column::SheetId.eq(id.as_str()))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(links, 2);
}

#[tokio::test]
async fn list_counts_distinct_sheets() {
    let app = TestApp::spawn().await;
    let token = app.token(1);
    app.create_sheet(
        &token,
        json!({ "title": "One", "singers": [{ "name": "A" }], "composers": [{ "name": "A" }] }),
        json!({}),
    )
    .await;
    app.create_sheet(&token, json!({ "title": "Two", "singers": [{ "name": "A" }] }), json!({}))
        .await;
    app.create_sheet(&token, json!({ "title": "Three", "composers": [{ "name": "B" }] }), json!({}))
        .await;

    let res = app.get_without_token(routes::ARTISTS).await;
    assert_eq!(res.status, 200);
    let artists = res.body["artists"].as_array().unwrap();
    let count_of = |name: &str| {
        artists
            .iter()
            .find(|a| a["name"] == name)
            .map(|a| a["sheetCount"].as_i64().unwrap())
    };
    assert_eq!(count_of("A"), Some(2));
    assert_eq!(count_of("B"), Some(1));
}

#[tokio::test]
async fn list_inlines_credited_sheets_with_roles() {
    let app = TestApp::spawn().await;
    let token = app.token(1);
    let staged = app.stage_image("listed.webp", b"img").await;
    let first = app
        .create_sheet(
            &token,
            json!({ "title": "First", "singers": [{ "name": "A" }], "coverImage": staged }),
            json!({}),
        )
        .await;
    let second = app
        .create_sheet(
            &token,
            json!({ "title": "Second", "singers": [{ "name": "A" }], "composers": [{ "name": "A" }] }),
            json!({}),
        )
        .await;

    let res = app.get_without_token(routes::ARTISTS).await;
    assert_eq!(res.status, 200, "{}", res.text);
    let a = res.body["artists"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == "A")
        .unwrap()
        .clone();
    assert_eq!(a["sheetCount"], 2);

    let sheets = a["sheets"].as_array().unwrap();
    assert_eq!(sheets.len(), 3);
    assert!(sheets[..2].iter().all(|s| s["id"] == second.as_str()));
    let mut roles: Vec<_> = sheets[..2].iter().map(|s| s["role"].as_str().unwrap()).collect();
    roles.sort();
    assert_eq!(roles, ["COMPOSER", "SINGER"]);

    assert_eq!(sheets[2]["id"], first.as_str());
    assert_eq!(sheets[2]["title"], "First");
    assert_eq!(sheets[2]["role"], "SINGER");
    assert_eq!(
        sheets[2]["coverImage"],
        format!("{}/images/{first}.webp", app.public_base_url)
    );
    assert!(sheets[1]["coverImage"].is_null());
}

#[tokio::test]
async fn detail_lists_sheets_with_roles() {
    let app = TestApp::spawn().await;
    let token = app.token(1);
    let id = app
        .create_sheet(
            &token,
            json!({ "title": "Song A", "singers": [{ "name": "A" }], "composers": [{ "name": "B" }] }),
            json!({}),
        )
        .await;

    let artist_id = artist::Entity::find()
        .filter(artist::Column::Name.eq("B"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap()
        .id;

    let res = app.get_without_token(&routes::artist(artist_id.into())).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["artist"]["name"], "B");
    assert_eq!(res.body["artist"]["sheetCount"], 1);
    let sheets = res.body["sheets"].as_array().unwrap();
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0]["id"], id.as_str());
    assert_eq!(sheets[0]["role"], "COMPOSER");
    assert_eq!(sheets[0]["title"], "Song A");
}

#[tokio::test]
async fn unknown_artist_is_not_found() {
    let app = TestApp::spawn().await;
    let res = app.get_without_token(&routes::artist(999_999)).await;
    assert_eq!(res.status, 404);
}
