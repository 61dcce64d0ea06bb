use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/sheets", sheet_routes())
        .nest("/artists", artist_routes())
        .nest("/images", image_routes(config))
}

fn sheet_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::sheet::create_sheet,
            handlers::sheet::edit_sheet
        ))
        .routes(routes!(handlers::sheet::save_sheet))
        .routes(routes!(handlers::sheet::list_recent))
        .routes(routes!(handlers::sheet::list_mine))
        .routes(routes!(handlers::like::list_liked))
        .routes(routes!(handlers::sheet::get_sheet))
        .routes(routes!(handlers::sheet::get_score))
        .routes(routes!(
            handlers::like::like_sheet,
            handlers::like::unlike_sheet
        ))
        .routes(routes!(handlers::like::like_status))
}

fn artist_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::artist::list_artists))
        .routes(routes!(handlers::artist::get_artist))
}

fn image_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::image::upload_image))
        .layer(handlers::image::upload_body_limit(
            config.storage.max_image_size,
        ))
}
