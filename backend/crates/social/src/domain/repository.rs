//! Repository Traits
//!
//! The persistence gateway seen from the domain. Implementations live in the
//! infrastructure layer.
//!
//! Uniqueness rules are the gateway's job: `insert_account` and
//! `insert_edge` check and write in one atomic step and report a conflict as
//! `Ok(false)`, so two concurrent callers can never both succeed.

use kernel::id::{AccountId, RecipeId};

use crate::domain::entity::{
    account::Account, feed::FeedItem, follow_edge::FollowEdge, recipe::Recipe,
};
use crate::domain::value_object::Email;
use crate::error::SocialResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert an account. `Ok(false)` when the email is already registered.
    async fn insert_account(&self, account: &Account) -> SocialResult<bool>;

    /// Find account by canonical email
    async fn find_account_by_email(&self, email: &Email) -> SocialResult<Option<Account>>;

    /// Find account by ID
    async fn find_account_by_id(&self, account_id: &AccountId) -> SocialResult<Option<Account>>;
}

/// Recipe repository trait
#[trait_variant::make(RecipeRepository: Send)]
pub trait LocalRecipeRepository {
    /// Insert a recipe. Fails with `AccountNotFound` for an unknown author.
    async fn insert_recipe(&self, recipe: &Recipe) -> SocialResult<()>;

    /// Find recipe by ID
    async fn find_recipe_by_id(&self, recipe_id: &RecipeId) -> SocialResult<Option<Recipe>>;
}

/// Follow graph repository trait
#[trait_variant::make(FollowRepository: Send)]
pub trait LocalFollowRepository {
    /// Insert an edge. `Ok(false)` when it already exists.
    ///
    /// Fails with `AccountNotFound` when either endpoint is unknown.
    async fn insert_edge(&self, edge: &FollowEdge) -> SocialResult<bool>;

    /// Delete an edge. `Ok(false)` when it did not exist.
    async fn delete_edge(&self, edge: &FollowEdge) -> SocialResult<bool>;

    async fn edge_exists(&self, edge: &FollowEdge) -> SocialResult<bool>;

    /// Recipes authored by accounts `follower_id` follows, newest first
    async fn feed_for(&self, follower_id: &AccountId) -> SocialResult<Vec<FeedItem>>;
}
