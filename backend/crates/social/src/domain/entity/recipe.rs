//! Recipe Entity

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, RecipeId};

use crate::domain::value_object::{RecipeDescription, RecipeTitle};

/// Recipe owned by exactly one account
#[derive(Debug, Clone)]
pub struct Recipe {
    pub recipe_id: RecipeId,
    pub title: RecipeTitle,
    pub description: RecipeDescription,
    /// Server-assigned publish time
    pub created_at: DateTime<Utc>,
    pub author_id: AccountId,
}

impl Recipe {
    pub fn new(author_id: AccountId, title: RecipeTitle, description: RecipeDescription) -> Self {
        Self {
            recipe_id: RecipeId::generate(),
            title,
            description,
            created_at: Utc::now(),
            author_id,
        }
    }
}
