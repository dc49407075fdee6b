//! Account Entity

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::password::HashedPassword;

use crate::domain::value_object::{AccountName, Email};

/// Registered identity.
///
/// Immutable once created in this core. `password_hash` must never leave the
/// service; response DTOs are built from the other fields only.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub name: AccountName,
    /// Canonical email (unique)
    pub email: Email,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a fresh identifier
    pub fn new(name: AccountName, email: Email, password_hash: HashedPassword) -> Self {
        Self {
            account_id: AccountId::generate(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
