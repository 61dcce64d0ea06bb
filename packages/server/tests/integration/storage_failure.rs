use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ::common::storage::memory::MemoryBlobStore;
use ::common::storage::{BlobKey, BlobStore, StorageError, StoredObject};
use async_trait::async_trait;
use serde_json::json;

use crate::common::{TestApp, routes};

const BACKEND_DETAIL: &str = "bucket unreachable: connection reset";

/// Delegates to the in-memory store but refuses score writes while `failing` is set.
struct FlakyScores {
    inner: Arc<MemoryBlobStore>,
    failing: Arc<AtomicBool>,
}

#[async_trait]
impl BlobStore for FlakyScores {
    async fn put(
        &self,
        key: &BlobKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) && key.as_str().starts_with("sheets/") {
            return Err(StorageError::Backend(BACKEND_DETAIL.into()));
        }
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, key: &BlobKey) -> Result<Option<StoredObject>, StorageError> {
        self.inner.get(key).await
    }
}

async fn spawn_flaky(failing: bool) -> (TestApp, Arc<AtomicBool>) {
    let flag = Arc::new(AtomicBool::new(failing));
    let switch = flag.clone();
    let app = TestApp::spawn_with_store(move |inner| {
        Arc::new(FlakyScores {
            inner,
            failing: switch,
        })
    })
    .await;
    (app, flag)
}

#[tokio::test]
async fn create_keeps_metadata_when_score_write_fails() {
    let (app, _) = spawn_flaky(true).await;

    let res = app
        .post_with_token(
            routes::SHEETS,
            &json!({
                "sheetMetadata": { "id": "half-written", "title": "T", "singers": [{ "name": "A" }] },
                "scoreData": { "key": "C" },
            }),
            &app.token(1),
        )
        .await;
    assert_eq!(res.status, 500, "{}", res.text);
    assert_eq!(res.code(), "INTERNAL_ERROR");
    assert!(!res.text.contains("connection reset"));
    assert!(!res.text.contains("half-written"));

    let sheet = app.get_without_token(&routes::sheet("half-written")).await;
    assert_eq!(sheet.status, 200);
    assert_eq!(sheet.body["title"], "T");

    let score = app.get_without_token(&routes::score("half-written")).await;
    assert_eq!(score.status, 404);
    assert!(app.blob("sheets/half-written.json").await.is_none());
}

#[tokio::test]
async fn edit_leaves_metadata_untouched_when_score_write_fails() {
    let (app, failing) = spawn_flaky(false).await;
    let token = app.token(1);
    let id = app
        .create_sheet(&token, json!({ "title": "Before", "singers": [{ "name": "A" }] }), json!({ "v": 1 }))
        .await;
    let before = app.get_without_token(&routes::sheet(&id)).await;

    failing.store(true, Ordering::SeqCst);
    let res = app
        .edit_sheet(
            &token,
            json!({ "id": id, "title": "After", "singers": [{ "name": "B" }] }),
            json!({ "v": 2 }),
        )
        .await;
    assert_eq!(res.status, 500, "{}", res.text);
    assert_eq!(res.code(), "INTERNAL_ERROR");
    assert!(!res.text.contains("connection reset"));

    let after = app.get_without_token(&routes::sheet(&id)).await;
    assert_eq!(after.body["title"], "Before");
    assert_eq!(after.body["lastModified"], before.body["lastModified"]);
    assert_eq!(after.body["singers"], before.body["singers"]);

    let score = app.get_without_token(&routes::score(&id)).await;
    assert_eq!(score.body, json!({ "v": 1 }));
}
