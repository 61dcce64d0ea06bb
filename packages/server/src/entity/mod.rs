pub mod artist;
pub mod sheet;
pub mod sheet_artist;
pub mod sheet_like;
