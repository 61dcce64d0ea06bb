use serde::Serialize;

/// Response of a staged image upload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StagedImageResponse {
    /// Pass this URL as `coverImage` when creating or editing a sheet.
    #[schema(example = "https://cdn.example.com/tmp/images/5f0c8d6e-0a55-4a8e-9a7e-6c1b0d4a2f10.webp")]
    pub cover_image: String,
}

