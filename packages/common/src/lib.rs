pub mod sheet;
pub mod storage;

pub use sheet::{ArtistRole, SheetType};
