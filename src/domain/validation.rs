//! Input checks shared by the application services.

use uuid::Uuid;

use super::error::DomainError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Parse a required user identifier.
pub fn require_user_id(raw: Option<&str>) -> Result<Uuid, DomainError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| DomainError::validation("User ID is required"))?;
    parse_user_id(raw)
}

pub fn parse_user_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::validation(format!("`{raw}` is not a valid user id")))
}

pub fn require_rating(rating: Option<i32>) -> Result<i32, DomainError> {
    let rating = rating.ok_or_else(|| DomainError::validation("Rating is required"))?;
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(DomainError::validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(rating)
}

/// Trimmed, non-blank text.
pub fn require_text(value: Option<&str>, field: &str) -> Result<String, DomainError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DomainError::validation(format!("{field} is required")))
}

/// Optional free text, with blank input treated as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
