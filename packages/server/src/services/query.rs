//! Read side: sheets with their credited artists, and artist listings.

use std::collections::{HashMap, HashSet};

use common::ArtistRole;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;
use tracing::warn;

use crate::entity::{artist, sheet, sheet_artist};
use crate::error::AppError;
use crate::models::artist::{
    ArtistDetailResponse, ArtistListing, ArtistSheet, ArtistSummary, CreditedSheet,
};
use crate::models::sheet::{ArtistRef, SheetSummary};

/// Number of sheets returned by [`SheetQueryService::recent`].
pub const RECENT_SHEETS: u64 = 10;

/// Number of artists returned by [`SheetQueryService::artists`].
pub const ARTIST_PAGE: u64 = 20;

/// Attach singers and composers to each sheet, keeping the input order.
pub async fn with_artists<C: ConnectionTrait>(
    conn: &C,
    sheets: Vec<sheet::Model>,
) -> Result<Vec<SheetSummary>, DbErr> {
    if sheets.is_empty() {
        return Ok(Vec::new());
    }

    let sheet_ids: Vec<String> = sheets.iter().map(|s| s.id.clone()).collect();
    let links = sheet_artist::Entity::find()
        .filter(sheet_artist::Column::SheetId.is_in(sheet_ids))
        .all(conn)
        .await?;

    let artist_ids: HashSet<i32> = links.iter().map(|l| l.artist_id).collect();
    let names: HashMap<i32, String> = if artist_ids.is_empty() {
        HashMap::new()
    } else {
        artist::Entity::find()
            .select_only()
            .column(artist::Column::Id)
            .column(artist::Column::Name)
            .filter(artist::Column::Id.is_in(artist_ids))
            .into_tuple::<(i32, String)>()
            .all(conn)
            .await?
            .into_iter()
            .collect()
    };

    let mut credits: HashMap<String, Vec<ArtistRef>> = HashMap::new();
    for link in links {
        let Ok(role) = link.role.parse::<ArtistRole>() else {
            warn!(sheet_id = %link.sheet_id, role = %link.role, "Ignoring link with unknown role");
            continue;
        };
        let Some(name) = names.get(&link.artist_id) else {
            continue;
        };
        credits.entry(link.sheet_id).or_default().push(ArtistRef {
            id: link.artist_id,
            name: name.clone(),
            role,
        });
    }

    Ok(sheets
        .into_iter()
        .map(|model| {
            let mut refs = credits.remove(&model.id).unwrap_or_default();
            refs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            let (singers, composers): (Vec<_>, Vec<_>) = refs
                .into_iter()
                .partition(|r| r.role == ArtistRole::Singer);
            SheetSummary::new(model, singers, composers)
        })
        .collect())
}

pub struct SheetQueryService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SheetQueryService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: &str) -> Result<SheetSummary, AppError> {
        let model = sheet::Entity::find_by_id(id.to_owned())
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Sheet not found".into()))?;
        let mut summaries = with_artists(self.conn, vec![model]).await?;
        summaries
            .pop()
            .ok_or_else(|| AppError::Internal("sheet vanished while attaching artists".into()))
    }

    /// The most recently created sheets, newest first.
    pub async fn recent(&self) -> Result<Vec<SheetSummary>, AppError> {
        let sheets = sheet::Entity::find()
            .order_by_desc(sheet::Column::CreatedAt)
            .limit(RECENT_SHEETS)
            .all(self.conn)
            .await?;
        Ok(with_artists(self.conn, sheets).await?)
    }

    /// Every sheet uploaded by `user_id`, newest first.
    pub async fn by_uploader(&self, user_id: i32) -> Result<Vec<SheetSummary>, AppError> {
        let sheets = sheet::Entity::find()
            .filter(sheet::Column::UploaderId.eq(user_id))
            .order_by_desc(sheet::Column::CreatedAt)
            .all(self.conn)
            .await?;
        Ok(with_artists(self.conn, sheets).await?)
    }

    async fn sheet_counts(&self, artist_ids: Vec<i32>) -> Result<HashMap<i32, i64>, DbErr> {
        if artist_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sheet_artist::Entity::find()
            .select_only()
            .column(sheet_artist::Column::ArtistId)
            .column_as(
                Expr::expr(Func::count_distinct(Expr::col(sheet_artist::Column::SheetId))),
                "sheet_count",
            )
            .filter(sheet_artist::Column::ArtistId.is_in(artist_ids))
            .group_by(sheet_artist::Column::ArtistId)
            .into_tuple::<(i32, i64)>()
            .all(self.conn)
            .await?;
        Ok(rows.into_iter().collect())
    }

    /// Sheets crediting each of `artist_ids`, newest sheet first.
    async fn credited_sheets(
        &self,
        artist_ids: Vec<i32>,
    ) -> Result<HashMap<i32, Vec<CreditedSheet>>, DbErr> {
        if artist_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let links = sheet_artist::Entity::find()
            .filter(sheet_artist::Column::ArtistId.is_in(artist_ids))
            .all(self.conn)
            .await?;
        if links.is_empty() {
            return Ok(HashMap::new());
        }

        let mut links_by_sheet: HashMap<String, Vec<sheet_artist::Model>> = HashMap::new();
        for link in links {
            links_by_sheet.entry(link.sheet_id.clone()).or_default().push(link);
        }
        let sheets = sheet::Entity::find()
            .filter(sheet::Column::Id.is_in(links_by_sheet.keys().cloned().collect::<Vec<_>>()))
            .order_by_desc(sheet::Column::CreatedAt)
            .all(self.conn)
            .await?;

        let mut credited: HashMap<i32, Vec<CreditedSheet>> = HashMap::new();
        for model in sheets {
            for link in links_by_sheet.get(&model.id).into_iter().flatten() {
                let Ok(role) = link.role.parse::<ArtistRole>() else {
                    continue;
                };
                credited.entry(link.artist_id).or_default().push(CreditedSheet {
                    id: model.id.clone(),
                    title: model.title.clone(),
                    cover_image: model.cover_image.clone(),
                    role,
                });
            }
        }
        Ok(credited)
    }

    /// The most recently created artists, each with how many sheets credit
    /// them and those sheets.
    pub async fn artists(&self) -> Result<Vec<ArtistListing>, AppError> {
        let artists = artist::Entity::find()
            .order_by_desc(artist::Column::CreatedAt)
            .order_by_desc(artist::Column::Id)
            .limit(ARTIST_PAGE)
            .all(self.conn)
            .await?;
        let ids: Vec<i32> = artists.iter().map(|a| a.id).collect();
        let counts = self.sheet_counts(ids.clone()).await?;
        let mut credited = self.credited_sheets(ids).await?;

        Ok(artists
            .into_iter()
            .map(|a| {
                let count = counts.get(&a.id).copied().unwrap_or(0);
                let sheets = credited.remove(&a.id).unwrap_or_default();
                ArtistListing {
                    artist: ArtistSummary::new(a, count),
                    sheets,
                }
            })
            .collect())
    }

    /// An artist and every sheet crediting them, newest sheet first.
    pub async fn artist_sheets(&self, artist_id: i32) -> Result<ArtistDetailResponse, AppError> {
        let model = artist::Entity::find_by_id(artist_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Artist not found".into()))?;

        let links = sheet_artist::Entity::find()
            .filter(sheet_artist::Column::ArtistId.eq(artist_id))
            .all(self.conn)
            .await?;

        let sheet_ids: HashSet<String> = links.iter().map(|l| l.sheet_id.clone()).collect();
        let sheets = if sheet_ids.is_empty() {
            Vec::new()
        } else {
            sheet::Entity::find()
                .filter(sheet::Column::Id.is_in(sheet_ids))
                .order_by_desc(sheet::Column::CreatedAt)
                .all(self.conn)
                .await?
        };
        let count = sheets.len() as i64;
        let summaries = with_artists(self.conn, sheets).await?;

        let mut entries = Vec::with_capacity(links.len());
        for summary in summaries {
            for link in links.iter().filter(|l| l.sheet_id == summary.id) {
                if let Ok(role) = link.role.parse::<ArtistRole>() {
                    entries.push(ArtistSheet {
                        role,
                        sheet: summary.clone(),
                    });
                }
            }
        }

        Ok(ArtistDetailResponse {
            artist: ArtistSummary::new(model, count),
            sheets: entries,
        })
    }
}
