use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LikeStatus {
    pub liked: bool,
}
