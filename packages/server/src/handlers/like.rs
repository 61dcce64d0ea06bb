use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::like::LikeStatus;
use crate::models::sheet::SheetListResponse;
use crate::services::like::LikeService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{id}/like",
    tag = "Likes",
    operation_id = "likeSheet",
    summary = "Like a sheet",
    description = "Idempotent: liking an already liked sheet succeeds without change.",
    params(("id" = String, Path, description = "Sheet ID")),
    responses(
        (status = 200, description = "Sheet liked", body = LikeStatus),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Sheet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(sheet_id = %id))]
pub async fn like_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LikeStatus>, AppError> {
    let liked = LikeService::new(&state.db)
        .like(auth_user.context(), &id)
        .await?;
    Ok(Json(LikeStatus { liked }))
}

#[utoipa::path(
    delete,
    path = "/{id}/like",
    tag = "Likes",
    operation_id = "unlikeSheet",
    summary = "Remove a like",
    description = "Always succeeds, even when the sheet was not liked or does not exist.",
    params(("id" = String, Path, description = "Sheet ID")),
    responses(
        (status = 200, description = "Like removed", body = LikeStatus),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(sheet_id = %id))]
pub async fn unlike_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LikeStatus>, AppError> {
    let liked = LikeService::new(&state.db)
        .unlike(auth_user.context(), &id)
        .await?;
    Ok(Json(LikeStatus { liked }))
}

#[utoipa::path(
    get,
    path = "/{id}/like-status",
    tag = "Likes",
    operation_id = "getLikeStatus",
    summary = "Whether the caller likes a sheet",
    params(("id" = String, Path, description = "Sheet ID")),
    responses(
        (status = 200, description = "Like status", body = LikeStatus),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Sheet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(sheet_id = %id))]
pub async fn like_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LikeStatus>, AppError> {
    let liked = LikeService::new(&state.db)
        .status(auth_user.context(), &id)
        .await?;
    Ok(Json(LikeStatus { liked }))
}

#[utoipa::path(
    get,
    path = "/liked",
    tag = "Likes",
    operation_id = "listLikedSheets",
    summary = "List sheets the caller likes",
    description = "Most recently liked first, each with its singers and composers.",
    responses(
        (status = 200, description = "Liked sheets", body = SheetListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_liked(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SheetListResponse>, AppError> {
    let sheets = LikeService::new(&state.db)
        .list_liked(auth_user.context())
        .await?;
    Ok(Json(SheetListResponse { sheets }))
}
