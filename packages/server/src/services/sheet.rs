//! Create and edit workflows for sheets.
//!
//! A sheet spans two stores: its row in the metadata database and its score
//! blob under `sheets/{id}.json`. No transaction covers both, so each
//! workflow fixes an order and reports partial failure instead of
//! compensating:
//!
//! * create writes the row, then the blob, then the artist links;
//! * edit writes the blob, then the row.

use chrono::Utc;
use common::SheetType;
use common::storage::{BlobKey, BlobStore};
use sea_orm::*;
use serde::Serialize;
use tracing::{Span, error, info, instrument, warn};
use uuid::Uuid;

use super::AuthContext;
use super::artist::{ArtistCredit, ArtistResolver};
use super::ingest::{ImageIngestor, PermanentName};
use crate::entity::sheet;
use crate::error::AppError;
use crate::models::shared::validate_title;

/// Longest accepted caller-supplied sheet id.
pub const MAX_SHEET_ID_LEN: usize = 64;

/// Caller-supplied ids end up in blob keys, so only a conservative
/// character set is accepted.
pub fn validate_sheet_id(id: &str) -> Result<(), AppError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_SHEET_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(AppError::Validation(format!(
            "Sheet id must be 1-{MAX_SHEET_ID_LEN} characters of A-Z, a-z, 0-9, '-' or '_'"
        )));
    }
    Ok(())
}

/// Blob key of a sheet's score.
pub fn score_key(sheet_id: &str) -> Result<BlobKey, AppError> {
    BlobKey::new(format!("sheets/{sheet_id}.json")).map_err(|e| AppError::Internal(e.to_string()))
}

#[derive(Debug, Clone, Default)]
pub struct NewSheet {
    pub id: Option<String>,
    pub title: Option<String>,
    pub sheet_type: SheetType,
    pub cover_image: Option<String>,
    pub bvid: Option<String>,
    pub singers: Vec<String>,
    pub composers: Vec<String>,
    pub score: Option<serde_json::Value>,
}

/// Changes to an existing sheet. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct SheetChanges {
    pub id: Option<String>,
    pub title: Option<String>,
    pub sheet_type: Option<SheetType>,
    pub cover_image: Option<String>,
    /// A blank value clears the stored reference.
    pub bvid: Option<String>,
    pub singers: Option<Vec<String>>,
    pub composers: Option<Vec<String>>,
    pub score: Option<serde_json::Value>,
}

impl SheetChanges {
    fn credits(&self) -> Option<Vec<ArtistCredit>> {
        if self.singers.is_none() && self.composers.is_none() {
            return None;
        }
        Some(ArtistCredit::from_lists(
            self.singers.as_deref().unwrap_or(&[]),
            self.composers.as_deref().unwrap_or(&[]),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageUpdateStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub sheet: sheet::Model,
    pub image_status: ImageUpdateStatus,
}

fn require_score(score: Option<serde_json::Value>) -> Result<Vec<u8>, AppError> {
    match score {
        None | Some(serde_json::Value::Null) => {
            Err(AppError::Validation("Score data is required".into()))
        }
        Some(value) => serde_json::to_vec(&value).map_err(|e| AppError::Internal(e.to_string())),
    }
}

fn normalize_bvid(bvid: Option<String>) -> Option<String> {
    bvid.map(|b| b.trim().to_owned()).filter(|b| !b.is_empty())
}

pub struct SheetService<'a, C: ConnectionTrait> {
    conn: &'a C,
    blobs: &'a dyn BlobStore,
    public_base_url: &'a str,
}

impl<'a, C: ConnectionTrait> SheetService<'a, C> {
    pub fn new(conn: &'a C, blobs: &'a dyn BlobStore, public_base_url: &'a str) -> Self {
        Self {
            conn,
            blobs,
            public_base_url,
        }
    }

    fn ingestor(&self) -> ImageIngestor<'a> {
        ImageIngestor::new(self.blobs, self.public_base_url)
    }

    /// Create a sheet owned by the caller and return its id.
    #[instrument(skip_all, fields(user_id = auth.user_id, sheet_id))]
    pub async fn create(&self, auth: AuthContext, new: NewSheet) -> Result<String, AppError> {
        let title = new.title.as_deref().unwrap_or_default().trim().to_owned();
        validate_title(&title)?;
        let blob = require_score(new.score)?;

        let id = match new.id {
            Some(id) => {
                validate_sheet_id(&id)?;
                id
            }
            None => Uuid::now_v7().to_string(),
        };
        Span::current().record("sheet_id", id.as_str());
        let key = score_key(&id)?;

        if sheet::Entity::find_by_id(id.clone())
            .one(self.conn)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!("Sheet '{id}' already exists")));
        }

        let cover_image = match new.cover_image.filter(|c| !c.trim().is_empty()) {
            Some(reference) => Some(
                self.ingestor()
                    .promote(reference.trim(), PermanentName::Sheet(&id))
                    .await?
                    .url,
            ),
            None => None,
        };

        let now = Utc::now();
        let model = sheet::ActiveModel {
            id: Set(id.clone()),
            uploader_id: Set(auth.user_id),
            title: Set(title),
            sheet_type: Set(new.sheet_type),
            cover_image: Set(cover_image),
            bvid: Set(normalize_bvid(new.bvid)),
            created_at: Set(now),
            last_modified: Set(now),
            ..Default::default()
        };
        sheet::Entity::insert(model)
            .exec_without_returning(self.conn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict(format!("Sheet '{id}' already exists"))
                }
                _ => AppError::from(e),
            })?;

        if let Err(e) = self.blobs.put(&key, &blob, "application/json").await {
            error!(sheet_id = %id, error = %e, "Score write failed after metadata insert");
            return Err(AppError::Internal(format!(
                "score blob for sheet {id} not written: {e}"
            )));
        }

        let credits = ArtistCredit::from_lists(new.singers.as_slice(), new.composers.as_slice());
        if !credits.is_empty()
            && let Err(e) = ArtistResolver::new(self.conn).relink(&id, &credits).await
        {
            warn!(sheet_id = %id, error = %e, "Artist linking failed");
        }

        info!("Sheet created");
        Ok(id)
    }

    /// Apply `changes` to a sheet owned by the caller.
    ///
    /// The score is always replaced. A cover image that fails to promote is
    /// reported through [`ImageUpdateStatus::Failed`] while every other change
    /// still applies.
    #[instrument(skip_all, fields(user_id = auth.user_id, sheet_id))]
    pub async fn edit(&self, auth: AuthContext, changes: SheetChanges) -> Result<EditOutcome, AppError> {
        let id = changes
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Validation("Sheet id is required".into()))?;
        Span::current().record("sheet_id", id.as_str());
        let title = match &changes.title {
            Some(t) => {
                validate_title(t)?;
                Some(t.trim().to_owned())
            }
            None => None,
        };
        let credits = changes.credits();
        let blob = require_score(changes.score)?;

        let existing = sheet::Entity::find_by_id(id.clone())
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Sheet not found".into()))?;
        if existing.uploader_id != auth.user_id {
            return Err(AppError::PermissionDenied);
        }

        let key = score_key(&id)?;
        if let Err(e) = self.blobs.put(&key, &blob, "application/json").await {
            error!(sheet_id = %id, error = %e, "Score overwrite failed");
            return Err(AppError::Internal(format!(
                "score blob for sheet {id} not written: {e}"
            )));
        }

        let mut image_status = ImageUpdateStatus::Success;
        let mut active: sheet::ActiveModel = existing.clone().into();
        let mut touched = false;

        if let Some(reference) = changes.cover_image.map(|c| c.trim().to_owned())
            && !reference.is_empty()
            && existing.cover_image.as_deref() != Some(reference.as_str())
        {
            match self
                .ingestor()
                .promote(&reference, PermanentName::ContentHash)
                .await
            {
                Ok(promoted) => {
                    active.cover_image = Set(Some(promoted.url));
                    touched = true;
                }
                Err(e) => {
                    warn!(sheet_id = %id, error = %e, "Cover image update failed");
                    image_status = ImageUpdateStatus::Failed;
                }
            }
        }

        if let Some(title) = title {
            active.title = Set(title);
            touched = true;
        }
        if let Some(sheet_type) = changes.sheet_type {
            active.sheet_type = Set(sheet_type);
            touched = true;
        }
        if let Some(bvid) = changes.bvid {
            active.bvid = Set(normalize_bvid(Some(bvid)));
            touched = true;
        }

        if let Some(credits) = credits {
            match ArtistResolver::new(self.conn).relink(&id, &credits).await {
                Ok(_) => touched = true,
                Err(e) => warn!(sheet_id = %id, error = %e, "Artist relinking failed"),
            }
        }

        let sheet = if touched {
            active.last_modified = Set(Utc::now());
            active.update(self.conn).await?
        } else {
            existing
        };

        info!(?image_status, "Sheet edited");
        Ok(EditOutcome {
            sheet,
            image_status,
        })
    }

    /// Fetch the stored score of a sheet.
    pub async fn score(&self, id: &str) -> Result<serde_json::Value, AppError> {
        let exists = sheet::Entity::find_by_id(id.to_owned())
            .one(self.conn)
            .await?
            .is_some();
        if !exists {
            return Err(AppError::NotFound("Sheet not found".into()));
        }

        let object = self
            .blobs
            .get(&score_key(id)?)
            .await?
            .ok_or_else(|| AppError::NotFound("Score not found".into()))?;
        serde_json::from_slice(&object.data).map_err(|e| AppError::Internal(e.to_string()))
    }
}
