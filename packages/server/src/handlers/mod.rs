pub mod artist;
pub mod file;
pub mod image;
pub mod like;
pub mod sheet;
