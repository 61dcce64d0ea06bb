mod artist;
mod cors;
mod files;
mod image;
mod like;
mod storage_failure;
