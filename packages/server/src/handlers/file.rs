use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use common::storage::BlobKey;
use tracing::instrument;

use crate::error::AppError;
use crate::services::ingest::{PERMANENT_PREFIX, STAGING_PREFIX};
use crate::state::AppState;

/// Only image objects are public. Score blobs are read through the sheet API.
fn is_public(key: &str) -> bool {
    key.starts_with(PERMANENT_PREFIX) || key.starts_with(STAGING_PREFIX)
}

/// Serve a stored image under the configured public base URL.
///
/// Mounted outside the API tree so URLs built from `storage.public_base_url`
/// resolve when no CDN or bucket sits in front of the server.
#[instrument(skip(state))]
pub async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("File not found".into());
    if !is_public(&key) {
        return Err(not_found());
    }
    let key = BlobKey::new(key).map_err(|_| not_found())?;
    let object = state.blob_store.get(&key).await?.ok_or_else(not_found)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, object.content_type)
        .header(header::CONTENT_LENGTH, object.data.len().to_string())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(object.data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
