//! Recipe Text Value Objects
//!
//! Title and description of a published recipe. Both are required; the only
//! shape checks are emptiness and length.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const RECIPE_TITLE_MAX_LENGTH: usize = 200;
pub const RECIPE_DESCRIPTION_MAX_LENGTH: usize = 10_000;

fn checked(value: String, field: &str, max: usize) -> AppResult<String> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > max {
        return Err(AppError::bad_request(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value)
}

/// Recipe title (trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    pub fn new(title: impl Into<String>) -> AppResult<Self> {
        let title = title.into().trim().to_string();
        checked(title, "Title", RECIPE_TITLE_MAX_LENGTH).map(Self)
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Recipe description
///
/// Kept verbatim: line breaks and indentation are part of the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub struct RecipeDescription(String);

impl RecipeDescription {
    pub fn new(description: impl Into<String>) -> AppResult<Self> {
        checked(
            description.into(),
            "Description",
            RECIPE_DESCRIPTION_MAX_LENGTH,
        )
        .map(Self)
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_rules() {
        assert_eq!(RecipeTitle::new(" Pancakes ").unwrap().as_str(), "Pancakes");
        assert!(RecipeTitle::new("").is_err());
        assert!(RecipeTitle::new("   ").is_err());
        assert!(RecipeTitle::new("x".repeat(RECIPE_TITLE_MAX_LENGTH)).is_ok());
        assert!(RecipeTitle::new("x".repeat(RECIPE_TITLE_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_description_kept_verbatim() {
        let text = "  1. Mix\n  2. Fry\n";
        assert_eq!(RecipeDescription::new(text).unwrap().as_str(), text);
    }

    #[test]
    fn test_description_rules() {
        assert!(RecipeDescription::new("").is_err());
        assert!(RecipeDescription::new("\n\n").is_err());
        assert!(
            RecipeDescription::new("x".repeat(RECIPE_DESCRIPTION_MAX_LENGTH + 1)).is_err()
        );
    }

    #[test]
    fn test_error_message_names_field() {
        let err = RecipeTitle::new("").unwrap_err();
        assert_eq!(err.message(), "Title cannot be empty");
    }
}
