//! Per-user likes and the caller's liked-sheet list.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use super::AuthContext;
use super::query::with_artists;
use crate::entity::{sheet, sheet_like};
use crate::error::AppError;
use crate::models::sheet::SheetSummary;

/// Per-user likes on sheets. Like and unlike are idempotent.
pub struct LikeService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> LikeService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn ensure_sheet(&self, sheet_id: &str) -> Result<(), AppError> {
        let exists = sheet::Entity::find_by_id(sheet_id.to_owned())
            .one(self.conn)
            .await?
            .is_some();
        if !exists {
            return Err(AppError::NotFound("Sheet not found".into()));
        }
        Ok(())
    }

    #[instrument(skip(self, auth), fields(user_id = auth.user_id))]
    pub async fn like(&self, auth: AuthContext, sheet_id: &str) -> Result<bool, AppError> {
        self.ensure_sheet(sheet_id).await?;

        let model = sheet_like::ActiveModel {
            user_id: Set(auth.user_id),
            sheet_id: Set(sheet_id.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let result = sheet_like::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([sheet_like::Column::UserId, sheet_like::Column::SheetId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;
        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the caller's like. Succeeds whether or not the like or the
    /// sheet exists.
    #[instrument(skip(self, auth), fields(user_id = auth.user_id))]
    pub async fn unlike(&self, auth: AuthContext, sheet_id: &str) -> Result<bool, AppError> {
        sheet_like::Entity::delete_many()
            .filter(sheet_like::Column::UserId.eq(auth.user_id))
            .filter(sheet_like::Column::SheetId.eq(sheet_id))
            .exec(self.conn)
            .await?;
        Ok(false)
    }

    pub async fn status(&self, auth: AuthContext, sheet_id: &str) -> Result<bool, AppError> {
        self.ensure_sheet(sheet_id).await?;
        let liked = sheet_like::Entity::find_by_id((auth.user_id, sheet_id.to_owned()))
            .one(self.conn)
            .await?
            .is_some();
        Ok(liked)
    }

    /// Sheets liked by the caller, most recent like first.
    pub async fn list_liked(&self, auth: AuthContext) -> Result<Vec<SheetSummary>, AppError> {
        let liked_ids: Vec<String> = sheet_like::Entity::find()
            .select_only()
            .column(sheet_like::Column::SheetId)
            .filter(sheet_like::Column::UserId.eq(auth.user_id))
            .order_by_desc(sheet_like::Column::CreatedAt)
            .into_tuple::<String>()
            .all(self.conn)
            .await?;
        if liked_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut sheets = sheet::Entity::find()
            .filter(sheet::Column::Id.is_in(liked_ids.clone()))
            .all(self.conn)
            .await?;
        sheets.sort_by_key(|s| liked_ids.iter().position(|id| *id == s.id));

        Ok(with_artists(self.conn, sheets).await?)
    }
}
