use crate::error::AppError;

/// Longest accepted title, in Unicode characters.
pub const MAX_TITLE_CHARS: usize = 256;

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "Title must be 1-{MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}
