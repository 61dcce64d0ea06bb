use common::SheetType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sheet")]
pub struct Model {
    /// Opaque id, either caller-supplied or a server-generated UUIDv7.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Identity of the creator. Never updated.
    pub uploader_id: i32,

    pub title: String,
    pub sheet_type: SheetType,

    /// Public URL of the promoted cover image.
    pub cover_image: Option<String>,

    /// Optional external video reference.
    pub bvid: Option<String>,

    #[sea_orm(has_many)]
    pub artists: HasMany<super::sheet_artist::Entity>,

    #[sea_orm(has_many)]
    pub likes: HasMany<super::sheet_like::Entity>,

    pub created_at: DateTimeUtc,
    pub last_modified: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
