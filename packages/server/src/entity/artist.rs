use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Exact, case-sensitive deduplication key.
    #[sea_orm(unique)]
    pub name: String,

    pub description: Option<String>,
    pub image: Option<String>,

    #[sea_orm(has_many)]
    pub sheets: HasMany<super::sheet_artist::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
