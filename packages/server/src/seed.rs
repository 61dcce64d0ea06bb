use sea_orm::*;
use sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use tracing::{info, warn};

use crate::entity::{sheet, sheet_artist, sheet_like};

/// Ensure secondary indexes exist.
///
/// Schema sync only creates primary keys and unique constraints, so the
/// indexes backing the list queries are created here on startup. Failures
/// are logged and do not stop the server.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes: [(&str, IndexCreateStatement); 3] = [
        (
            // Sheets of one uploader, newest first.
            "idx_sheet_uploader_created",
            Index::create()
                .if_not_exists()
                .name("idx_sheet_uploader_created")
                .table(sheet::Entity)
                .col(sheet::Column::UploaderId)
                .col(sheet::Column::CreatedAt)
                .to_owned(),
        ),
        (
            // Likes of one user, most recent first.
            "idx_sheet_like_user_created",
            Index::create()
                .if_not_exists()
                .name("idx_sheet_like_user_created")
                .table(sheet_like::Entity)
                .col(sheet_like::Column::UserId)
                .col(sheet_like::Column::CreatedAt)
                .to_owned(),
        ),
        (
            // Sheets of one artist, and per-artist counts.
            "idx_sheet_artist_artist",
            Index::create()
                .if_not_exists()
                .name("idx_sheet_artist_artist")
                .table(sheet_artist::Entity)
                .col(sheet_artist::Column::ArtistId)
                .to_owned(),
        ),
    ];

    for (name, stmt) in indexes {
        match db
            .execute_unprepared(&stmt.to_string(PostgresQueryBuilder))
            .await
        {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}
