//! Artist identities and the sheet <-> artist link table.

use std::collections::HashSet;

use chrono::Utc;
use common::ArtistRole;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::{debug, instrument, warn};

use crate::entity::{artist, sheet_artist};

/// A named artist credited on a sheet in a given role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistCredit {
    pub name: String,
    pub role: ArtistRole,
}

impl ArtistCredit {
    /// Build credits from singer and composer name lists.
    ///
    /// Names are trimmed and blank names dropped.
    pub fn from_lists<S: AsRef<str>>(singers: &[S], composers: &[S]) -> Vec<ArtistCredit> {
        let tag = |names: &[S], role: ArtistRole| {
            names
                .iter()
                .map(|n| n.as_ref().trim())
                .filter(|n| !n.is_empty())
                .map(move |n| ArtistCredit {
                    name: n.to_owned(),
                    role,
                })
                .collect::<Vec<_>>()
        };
        let mut credits = tag(singers, ArtistRole::Singer);
        credits.extend(tag(composers, ArtistRole::Composer));
        credits
    }
}

pub struct ArtistResolver<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ArtistResolver<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn find(&self, name: &str) -> Result<Option<i32>, DbErr> {
        artist::Entity::find()
            .select_only()
            .column(artist::Column::Id)
            .filter(artist::Column::Name.eq(name))
            .into_tuple::<i32>()
            .one(self.conn)
            .await
    }

    /// Find the artist named exactly `name`, creating it if needed.
    ///
    /// Concurrent callers racing on a new name converge on the same row: the
    /// insert is a no-op when the unique name already exists.
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> Result<i32, DbErr> {
        if name.is_empty() {
            return Err(DbErr::Custom("artist name must not be empty".into()));
        }
        if let Some(id) = self.find(name).await? {
            return Ok(id);
        }

        let model = artist::ActiveModel {
            name: Set(name.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let result = artist::Entity::insert(model)
            .on_conflict(
                OnConflict::column(artist::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;
        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }

        self.find(name)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("artist '{name}' missing after upsert")))
    }

    /// Replace every artist link of `sheet_id` with `credits`.
    ///
    /// Credits whose artist cannot be resolved are skipped. Duplicate
    /// (artist, role) pairs collapse into one link. Returns the number of
    /// links written.
    #[instrument(skip(self, credits), fields(credits = credits.len()))]
    pub async fn relink(&self, sheet_id: &str, credits: &[ArtistCredit]) -> Result<usize, DbErr> {
        sheet_artist::Entity::delete_many()
            .filter(sheet_artist::Column::SheetId.eq(sheet_id))
            .exec(self.conn)
            .await?;

        let mut links = HashSet::new();
        for credit in credits {
            match self.resolve(&credit.name).await {
                Ok(artist_id) => {
                    links.insert((artist_id, credit.role));
                }
                Err(e) => {
                    warn!(name = %credit.name, role = %credit.role, error = %e, "Skipping unresolvable artist");
                }
            }
        }

        if links.is_empty() {
            return Ok(0);
        }

        let count = links.len();
        let models = links.into_iter().map(|(artist_id, role)| sheet_artist::ActiveModel {
            sheet_id: Set(sheet_id.to_owned()),
            artist_id: Set(artist_id),
            role: Set(role.as_str().to_owned()),
            ..Default::default()
        });

        let result = sheet_artist::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    sheet_artist::Column::SheetId,
                    sheet_artist::Column::ArtistId,
                    sheet_artist::Column::Role,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;
        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }

        debug!(links = count, "Relinked artists");
        Ok(count)
    }
}
