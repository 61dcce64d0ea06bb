use chrono::{DateTime, Utc};
use common::{ArtistRole, SheetType};
use serde::{Deserialize, Serialize};

use crate::entity::sheet;
use crate::services::sheet::{EditOutcome, ImageUpdateStatus, NewSheet, SheetChanges};

/// An artist as referenced from a sheet.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ArtistRef {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Singer A")]
    pub name: String,
    pub role: ArtistRole,
}

/// Sheet metadata with its credited artists.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetSummary {
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: String,
    pub uploader_id: i32,
    #[schema(example = "Song A")]
    pub title: String,
    pub sheet_type: SheetType,
    #[schema(example = "https://cdn.example.com/images/01936f0e-1234-7abc-8000-000000000001.webp")]
    pub cover_image: Option<String>,
    pub bvid: Option<String>,
    pub singers: Vec<ArtistRef>,
    pub composers: Vec<ArtistRef>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl SheetSummary {
    pub fn new(model: sheet::Model, singers: Vec<ArtistRef>, composers: Vec<ArtistRef>) -> Self {
        Self {
            id: model.id,
            uploader_id: model.uploader_id,
            title: model.title,
            sheet_type: model.sheet_type,
            cover_image: model.cover_image,
            bvid: model.bvid,
            singers,
            composers,
            created_at: model.created_at,
            last_modified: model.last_modified,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ArtistNameInput {
    #[schema(example = "Singer A")]
    pub name: String,
}

fn names(list: Option<Vec<ArtistNameInput>>) -> Option<Vec<String>> {
    list.map(|l| l.into_iter().map(|a| a.name).collect())
}

/// Sheet fields supplied on create or edit. Absent fields are left alone on edit.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetMetadataInput {
    /// Required on edit. Optional on create, where a UUIDv7 is generated
    /// when omitted.
    pub id: Option<String>,
    #[schema(example = "Song A")]
    pub title: Option<String>,
    pub sheet_type: Option<SheetType>,
    /// URL of an image staged under `tmp/images/`.
    #[schema(example = "https://cdn.example.com/tmp/images/5f0c.webp")]
    pub cover_image: Option<String>,
    pub bvid: Option<String>,
    pub singers: Option<Vec<ArtistNameInput>>,
    pub composers: Option<Vec<ArtistNameInput>>,
}

/// Request body for creating or editing a sheet.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetRequest {
    pub sheet_metadata: SheetMetadataInput,
    /// Score content, stored verbatim.
    #[schema(value_type = Object)]
    pub score_data: Option<serde_json::Value>,
}

impl From<SheetRequest> for NewSheet {
    fn from(req: SheetRequest) -> Self {
        let meta = req.sheet_metadata;
        NewSheet {
            id: meta.id,
            title: meta.title,
            sheet_type: meta.sheet_type.unwrap_or_default(),
            cover_image: meta.cover_image,
            bvid: meta.bvid,
            singers: names(meta.singers).unwrap_or_default(),
            composers: names(meta.composers).unwrap_or_default(),
            score: req.score_data,
        }
    }
}

impl From<SheetRequest> for SheetChanges {
    fn from(req: SheetRequest) -> Self {
        let meta = req.sheet_metadata;
        SheetChanges {
            id: meta.id,
            title: meta.title,
            sheet_type: meta.sheet_type,
            cover_image: meta.cover_image,
            bvid: meta.bvid,
            singers: names(meta.singers),
            composers: names(meta.composers),
            score: req.score_data,
        }
    }
}

/// Flat request body of the save endpoint. With `id` it edits, without it creates.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSheetRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub sheet_type: Option<SheetType>,
    pub singers: Option<Vec<ArtistNameInput>>,
    pub composers: Option<Vec<ArtistNameInput>>,
    pub cover_image: Option<String>,
    pub bvid: Option<String>,
    #[schema(example = "C")]
    pub key: Option<String>,
    #[schema(value_type = Object, example = 120)]
    pub tempo: Option<serde_json::Value>,
    #[schema(example = "4/4")]
    pub time_signature: Option<String>,
    #[schema(value_type = Object)]
    pub content: Option<serde_json::Value>,
}

impl SaveSheetRequest {
    /// Split into the nested form used by create and edit.
    ///
    /// Missing `content` yields no score at all so the usual validation
    /// applies.
    pub fn into_sheet_request(self) -> SheetRequest {
        let score_data = self.content.filter(|c| !c.is_null()).map(|content| {
            serde_json::json!({
                "key": self.key,
                "tempo": self.tempo,
                "timeSignature": self.time_signature,
                "content": content,
            })
        });
        SheetRequest {
            sheet_metadata: SheetMetadataInput {
                id: self.id,
                title: self.title,
                sheet_type: self.sheet_type,
                cover_image: self.cover_image,
                bvid: self.bvid,
                singers: self.singers,
                composers: self.composers,
            },
            score_data,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreateSheetResponse {
    pub id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditSheetResponse {
    pub id: String,
    pub image_update_status: ImageUpdateStatus,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl From<EditOutcome> for EditSheetResponse {
    fn from(outcome: EditOutcome) -> Self {
        Self {
            id: outcome.sheet.id,
            image_update_status: outcome.image_status,
            cover_image: outcome.sheet.cover_image,
            created_at: outcome.sheet.created_at,
            last_modified: outcome.sheet.last_modified,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SheetListResponse {
    pub sheets: Vec<SheetSummary>,
}
