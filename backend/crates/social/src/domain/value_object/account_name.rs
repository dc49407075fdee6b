//! Account Name Value Object
//!
//! Display name shown next to an account's recipes. Not unique; accounts are
//! identified by id and email.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum account name length (in characters)
pub const ACCOUNT_NAME_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub struct AccountName(String);

impl AccountName {
    /// Trimmed, non-empty, at most [`ACCOUNT_NAME_MAX_LENGTH`] characters
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(AppError::bad_request("Name cannot be empty"));
        }
        if name.chars().count() > ACCOUNT_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                ACCOUNT_NAME_MAX_LENGTH
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_name_trimmed() {
        let name = AccountName::new("  Ana ").unwrap();
        assert_eq!(name.as_str(), "Ana");
    }

    #[test]
    fn test_account_name_invalid() {
        assert!(AccountName::new("").is_err());
        assert!(AccountName::new(" \t ").is_err());
        assert!(AccountName::new("An\na").is_err());
        assert!(AccountName::new("a".repeat(ACCOUNT_NAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_account_name_counts_characters() {
        // 64 multi-byte characters fit
        assert!(AccountName::new("ñ".repeat(ACCOUNT_NAME_MAX_LENGTH)).is_ok());
    }
}
