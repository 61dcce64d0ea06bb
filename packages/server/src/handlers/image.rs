use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::image::StagedImageResponse;
use crate::services::staging::ImageStagingService;
use crate::state::AppState;

/// Request body limit for image uploads: the image itself plus multipart overhead.
pub fn upload_body_limit(max_image_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_image_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(limit.saturating_add(64 * 1024))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Images",
    operation_id = "uploadImage",
    summary = "Stage a cover image",
    description = "Uploads a png, jpg, jpeg or gif image in the `file` multipart field. The image \
        is converted to WebP when a conversion service is configured and stored under \
        `tmp/images/`. Use the returned URL as `coverImage` when creating or editing a sheet.",
    request_body(content_type = "multipart/form-data", description = "Image upload"),
    responses(
        (status = 200, description = "Image staged", body = StagedImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Conversion service failed (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn upload_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<StagedImageResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation("File name is required".into()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?;
        upload = Some((file_name, data.to_vec()));
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("Missing file field".into()))?;

    let service = ImageStagingService {
        store: &*state.blob_store,
        converter: &*state.converter,
        public_base_url: &state.config.storage.public_base_url,
        max_size: state.config.storage.max_image_size,
    };
    let cover_image = service.stage(&file_name, data).await?;

    Ok(Json(StagedImageResponse { cover_image }))
}
