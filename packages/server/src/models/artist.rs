use chrono::{DateTime, Utc};
use common::ArtistRole;
use serde::Serialize;

use super::sheet::SheetSummary;
use crate::entity::artist;

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSummary {
    pub id: i32,
    #[schema(example = "Singer A")]
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Number of distinct sheets crediting this artist.
    pub sheet_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ArtistSummary {
    pub fn new(model: artist::Model, sheet_count: i64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image: model.image,
            sheet_count,
            created_at: model.created_at,
        }
    }
}

/// A sheet reference inside an artist listing entry.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditedSheet {
    pub id: String,
    pub title: String,
    pub cover_image: Option<String>,
    pub role: ArtistRole,
}

/// An artist together with every sheet crediting them, newest sheet first.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ArtistListing {
    #[serde(flatten)]
    pub artist: ArtistSummary,
    pub sheets: Vec<CreditedSheet>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ArtistListResponse {
    pub artists: Vec<ArtistListing>,
}

/// A sheet crediting the artist, with the role it is credited in.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ArtistSheet {
    pub role: ArtistRole,
    #[serde(flatten)]
    pub sheet: SheetSummary,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ArtistDetailResponse {
    pub artist: ArtistSummary,
    pub sheets: Vec<ArtistSheet>,
}
