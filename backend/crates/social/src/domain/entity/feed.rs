//! Feed Item

use crate::domain::entity::recipe::Recipe;
use crate::domain::value_object::AccountName;

/// One feed row: a recipe joined with its author's name
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub recipe: Recipe,
    pub author_name: AccountName,
}
