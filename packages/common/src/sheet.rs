#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Notation flavour of a sheet.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum SheetType {
    /// Numbered (jianpu-style) notation.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "simple"))]
    Simple,
    /// Full staff notation.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "full"))]
    Full,
}

impl SheetType {
    pub const ALL: &'static [SheetType] = &[Self::Simple, Self::Full];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for SheetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role an artist plays on a sheet.
///
/// Stored as a plain string column because it is part of the link table's
/// composite primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArtistRole {
    Singer,
    Composer,
}

impl ArtistRole {
    pub const ALL: &'static [ArtistRole] = &[Self::Singer, Self::Composer];

    /// Returns the stored representation (`SINGER` / `COMPOSER`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singer => "SINGER",
            Self::Composer => "COMPOSER",
        }
    }
}

impl fmt::Display for ArtistRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown enum string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    invalid: String,
    valid: Vec<&'static str>,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Valid values: {}",
            self.kind,
            self.invalid,
            self.valid.join(", ")
        )
    }
}

impl std::error::Error for ParseEnumError {}

impl FromStr for SheetType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "full" => Ok(Self::Full),
            _ => Err(ParseEnumError {
                kind: "sheet type",
                invalid: s.to_string(),
                valid: Self::ALL.iter().map(|t| t.as_str()).collect(),
            }),
        }
    }
}

impl FromStr for ArtistRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SINGER" => Ok(Self::Singer),
            "COMPOSER" => Ok(Self::Composer),
            _ => Err(ParseEnumError {
                kind: "artist role",
                invalid: s.to_string(),
                valid: Self::ALL.iter().map(|r| r.as_str()).collect(),
            }),
        }
    }
}
