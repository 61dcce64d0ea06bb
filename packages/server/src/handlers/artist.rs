use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::artist::{ArtistDetailResponse, ArtistListResponse};
use crate::services::query::SheetQueryService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Artists",
    operation_id = "listArtists",
    summary = "List recently added artists",
    description = "Returns the 20 most recently created artists, each with the number of sheets crediting them and a short reference to each of those sheets.",
    responses(
        (status = 200, description = "Artists", body = ArtistListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_artists(State(state): State<AppState>) -> Result<Json<ArtistListResponse>, AppError> {
    let artists = SheetQueryService::new(&state.db).artists().await?;
    Ok(Json(ArtistListResponse { artists }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Artists",
    operation_id = "getArtist",
    summary = "Get an artist and their sheets",
    params(("id" = i32, Path, description = "Artist ID")),
    responses(
        (status = 200, description = "Artist with credited sheets", body = ArtistDetailResponse),
        (status = 404, description = "Artist not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(artist_id = id))]
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistDetailResponse>, AppError> {
    let detail = SheetQueryService::new(&state.db).artist_sheets(id).await?;
    Ok(Json(detail))
}
