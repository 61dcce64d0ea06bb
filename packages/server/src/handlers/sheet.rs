use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::sheet::*;
use crate::services::query::SheetQueryService;
use crate::services::sheet::SheetService;
use crate::state::AppState;

fn sheet_service(state: &AppState) -> SheetService<'_, sea_orm::DatabaseConnection> {
    SheetService::new(
        &state.db,
        &*state.blob_store,
        &state.config.storage.public_base_url,
    )
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Sheets",
    operation_id = "createSheet",
    summary = "Create a sheet",
    description = "Creates a sheet owned by the caller. `title` and `scoreData` are required. \
        A `coverImage` must point at an image staged under `tmp/images/`; it is copied to its \
        permanent location before anything is written, and any failure aborts the create.",
    request_body = SheetRequest,
    responses(
        (status = 201, description = "Sheet created", body = CreateSheetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Staged image not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Sheet id already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SheetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = sheet_service(&state)
        .create(auth_user.context(), payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(CreateSheetResponse { id })))
}

#[utoipa::path(
    put,
    path = "/",
    tag = "Sheets",
    operation_id = "editSheet",
    summary = "Edit a sheet",
    description = "Replaces the score and updates the metadata fields that are present. Only the \
        uploader may edit. A cover image that cannot be promoted does not fail the request; it is \
        reported as `imageUpdateStatus: \"failed\"`. Supplying either artist list replaces all \
        artist links of the sheet.",
    request_body = SheetRequest,
    responses(
        (status = 200, description = "Sheet updated", body = EditSheetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the uploader (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sheet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn edit_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SheetRequest>,
) -> Result<Json<EditSheetResponse>, AppError> {
    let outcome = sheet_service(&state)
        .edit(auth_user.context(), payload.into())
        .await?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    put,
    path = "/save",
    tag = "Sheets",
    operation_id = "saveSheet",
    summary = "Create or edit a sheet from a flat body",
    description = "Builds `scoreData` from `key`, `tempo`, `timeSignature` and `content`, then \
        edits the sheet when `id` is present and creates one otherwise.",
    request_body = SaveSheetRequest,
    responses(
        (status = 200, description = "Sheet updated", body = EditSheetResponse),
        (status = 201, description = "Sheet created", body = CreateSheetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the uploader (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sheet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, sheet_id = ?payload.id))]
pub async fn save_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveSheetRequest>,
) -> Result<Response, AppError> {
    let editing = payload.id.is_some();
    let request = payload.into_sheet_request();
    let service = sheet_service(&state);

    if editing {
        let outcome = service.edit(auth_user.context(), request.into()).await?;
        Ok(Json(EditSheetResponse::from(outcome)).into_response())
    } else {
        let id = service.create(auth_user.context(), request.into()).await?;
        Ok((StatusCode::CREATED, Json(CreateSheetResponse { id })).into_response())
    }
}

#[utoipa::path(
    get,
    path = "/recent",
    tag = "Sheets",
    operation_id = "listRecentSheets",
    summary = "List recently created sheets",
    description = "Returns the 10 most recently created sheets with their singers and composers.",
    responses(
        (status = 200, description = "Recent sheets", body = SheetListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_recent(State(state): State<AppState>) -> Result<Json<SheetListResponse>, AppError> {
    let sheets = SheetQueryService::new(&state.db).recent().await?;
    Ok(Json(SheetListResponse { sheets }))
}

#[utoipa::path(
    get,
    path = "/mine",
    tag = "Sheets",
    operation_id = "listMySheets",
    summary = "List the caller's sheets",
    responses(
        (status = 200, description = "Sheets uploaded by the caller, newest first", body = SheetListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_mine(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SheetListResponse>, AppError> {
    let sheets = SheetQueryService::new(&state.db)
        .by_uploader(auth_user.user_id)
        .await?;
    Ok(Json(SheetListResponse { sheets }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Sheets",
    operation_id = "getSheet",
    summary = "Get sheet metadata",
    params(("id" = String, Path, description = "Sheet ID")),
    responses(
        (status = 200, description = "Sheet metadata with artists", body = SheetSummary),
        (status = 404, description = "Sheet not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(sheet_id = %id))]
pub async fn get_sheet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SheetSummary>, AppError> {
    let sheet = SheetQueryService::new(&state.db).get(&id).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    get,
    path = "/{id}/score",
    tag = "Sheets",
    operation_id = "getSheetScore",
    summary = "Get the score of a sheet",
    params(("id" = String, Path, description = "Sheet ID")),
    responses(
        (status = 200, description = "Stored score content, returned verbatim"),
        (status = 404, description = "Sheet or score not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(sheet_id = %id))]
pub async fn get_score(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let score = sheet_service(&state).score(&id).await?;
    Ok(Json(score))
}
