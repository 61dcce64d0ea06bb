mod error;
mod hash;
mod key;
mod traits;

pub mod filesystem;
pub mod memory;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use hash::ContentHash;
pub use key::BlobKey;
pub use traits::{BlobStore, StoredObject};
