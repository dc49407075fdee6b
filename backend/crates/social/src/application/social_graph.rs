//! Social Graph Manager
//!
//! Accounts, recipes and the follow graph on top of the persistence gateway.
//! Holds no mutable state of its own; every invariant that must survive
//! concurrent callers is enforced by the gateway in a single atomic step.

use std::sync::Arc;

use kernel::id::{AccountId, RecipeId};
use platform::password::HashedPassword;

use crate::domain::entity::{
    account::Account, feed::FeedItem, follow_edge::FollowEdge, recipe::Recipe,
};
use crate::domain::repository::{AccountRepository, FollowRepository, RecipeRepository};
use crate::domain::value_object::{AccountName, Email, RecipeDescription, RecipeTitle};
use crate::error::{SocialError, SocialResult};

pub struct SocialGraph<R> {
    repo: Arc<R>,
}

impl<R> Clone for SocialGraph<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> SocialGraph<R>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Register an account. Fails with `DuplicateEmail` if the canonical
    /// email is taken, including by a concurrent registration.
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        password_hash: HashedPassword,
    ) -> SocialResult<AccountId> {
        let account = Account::new(AccountName::new(name)?, Email::new(email)?, password_hash);

        if !self.repo.insert_account(&account).await? {
            return Err(SocialError::DuplicateEmail);
        }

        tracing::info!(account_id = %account.account_id, "Account created");
        Ok(account.account_id)
    }

    pub async fn find_account_by_email(&self, email: &Email) -> SocialResult<Account> {
        self.repo
            .find_account_by_email(email)
            .await?
            .ok_or(SocialError::AccountNotFound)
    }

    pub async fn find_account_by_id(&self, account_id: &AccountId) -> SocialResult<Account> {
        self.repo
            .find_account_by_id(account_id)
            .await?
            .ok_or(SocialError::AccountNotFound)
    }

    /// Publish a recipe with a server-assigned timestamp
    pub async fn publish_recipe(
        &self,
        author_id: AccountId,
        title: &str,
        description: &str,
    ) -> SocialResult<RecipeId> {
        let recipe = Recipe::new(
            author_id,
            RecipeTitle::new(title)?,
            RecipeDescription::new(description)?,
        );

        self.repo.insert_recipe(&recipe).await?;

        tracing::info!(
            recipe_id = %recipe.recipe_id,
            author_id = %author_id,
            "Recipe published"
        );
        Ok(recipe.recipe_id)
    }

    pub async fn get_recipe(&self, recipe_id: &RecipeId) -> SocialResult<Recipe> {
        self.repo
            .find_recipe_by_id(recipe_id)
            .await?
            .ok_or(SocialError::RecipeNotFound)
    }

    /// absent -> present, else `AlreadyFollowing`
    pub async fn follow(&self, follower_id: AccountId, followee_id: AccountId) -> SocialResult<()> {
        let edge = FollowEdge::new(follower_id, followee_id)?;

        if !self.repo.insert_edge(&edge).await? {
            return Err(SocialError::AlreadyFollowing);
        }

        tracing::info!(follower_id = %follower_id, followee_id = %followee_id, "Followed");
        Ok(())
    }

    /// present -> absent, else `NotFollowing`
    pub async fn unfollow(
        &self,
        follower_id: AccountId,
        followee_id: AccountId,
    ) -> SocialResult<()> {
        // A self-edge can never exist
        let edge = FollowEdge::new(follower_id, followee_id)
            .map_err(|_| SocialError::NotFollowing)?;

        if !self.repo.delete_edge(&edge).await? {
            return Err(SocialError::NotFollowing);
        }

        tracing::info!(follower_id = %follower_id, followee_id = %followee_id, "Unfollowed");
        Ok(())
    }

    pub async fn edge_exists(
        &self,
        follower_id: AccountId,
        followee_id: AccountId,
    ) -> SocialResult<bool> {
        match FollowEdge::new(follower_id, followee_id) {
            Ok(edge) => self.repo.edge_exists(&edge).await,
            Err(_) => Ok(false),
        }
    }

    /// Recipes by followed accounts, newest first. Empty is not an error.
    pub async fn get_feed(&self, account_id: &AccountId) -> SocialResult<Vec<FeedItem>> {
        let feed = self.repo.feed_for(account_id).await?;
        tracing::debug!(account_id = %account_id, items = feed.len(), "Feed assembled");
        Ok(feed)
    }
}
