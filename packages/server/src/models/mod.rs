pub mod artist;
pub mod image;
pub mod like;
pub mod shared;
pub mod sheet;
