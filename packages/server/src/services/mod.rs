pub mod artist;
pub mod conversion;
pub mod ingest;
pub mod like;
pub mod query;
pub mod sheet;
pub mod staging;

/// Verified identity of the caller, passed explicitly to every mutating
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i32,
}
