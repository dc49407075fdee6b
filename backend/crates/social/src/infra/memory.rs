//! In-Memory Repository Implementation
//!
//! Same contracts as the PostgreSQL gateway, backed by sharded concurrent
//! maps. Uniqueness checks go through the map entry APIs so the check and
//! the write happen under one shard lock. Used by tests and local
//! development; nothing survives a restart.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use kernel::id::{AccountId, RecipeId};
use uuid::Uuid;

use crate::domain::entity::{
    account::Account, feed::FeedItem, follow_edge::FollowEdge, recipe::Recipe,
};
use crate::domain::repository::{AccountRepository, FollowRepository, RecipeRepository};
use crate::domain::value_object::Email;
use crate::error::{SocialError, SocialResult};

#[derive(Default)]
struct Inner {
    accounts: DashMap<Uuid, Account>,
    /// Canonical email -> account id
    email_index: DashMap<String, Uuid>,
    recipes: DashMap<Uuid, Recipe>,
    /// (follower, followee)
    edges: DashSet<(Uuid, Uuid)>,
}

/// DashMap-backed social repository. Clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemorySocialRepository {
    inner: Arc<Inner>,
}

impl InMemorySocialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of follow edges currently stored
    pub fn edge_count(&self) -> usize {
        self.inner.edges.len()
    }

    fn ensure_account(&self, account_id: &AccountId) -> SocialResult<()> {
        if self.inner.accounts.contains_key(account_id.as_uuid()) {
            Ok(())
        } else {
            Err(SocialError::AccountNotFound)
        }
    }
}

impl AccountRepository for InMemorySocialRepository {
    async fn insert_account(&self, account: &Account) -> SocialResult<bool> {
        match self.inner.email_index.entry(account.email.as_str().to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                let account_id = *account.account_id.as_uuid();
                if self.inner.accounts.contains_key(&account_id) {
                    return Err(SocialError::Internal(format!(
                        "Account id collision: {}",
                        account_id
                    )));
                }
                // Account first, so a reader that finds the index entry finds the account
                self.inner.accounts.insert(account_id, account.clone());
                slot.insert(account_id);
                Ok(true)
            }
        }
    }

    async fn find_account_by_email(&self, email: &Email) -> SocialResult<Option<Account>> {
        let Some(account_id) = self.inner.email_index.get(email.as_str()).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self
            .inner
            .accounts
            .get(&account_id)
            .map(|account| account.value().clone()))
    }

    async fn find_account_by_id(&self, account_id: &AccountId) -> SocialResult<Option<Account>> {
        Ok(self
            .inner
            .accounts
            .get(account_id.as_uuid())
            .map(|account| account.value().clone()))
    }
}

impl RecipeRepository for InMemorySocialRepository {
    async fn insert_recipe(&self, recipe: &Recipe) -> SocialResult<()> {
        self.ensure_account(&recipe.author_id)?;

        match self.inner.recipes.entry(*recipe.recipe_id.as_uuid()) {
            Entry::Occupied(_) => Err(SocialError::Internal(format!(
                "Recipe id collision: {}",
                recipe.recipe_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(recipe.clone());
                Ok(())
            }
        }
    }

    async fn find_recipe_by_id(&self, recipe_id: &RecipeId) -> SocialResult<Option<Recipe>> {
        Ok(self
            .inner
            .recipes
            .get(recipe_id.as_uuid())
            .map(|recipe| recipe.value().clone()))
    }
}

impl FollowRepository for InMemorySocialRepository {
    async fn insert_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        self.ensure_account(&edge.follower_id())?;
        self.ensure_account(&edge.followee_id())?;

        Ok(self.inner.edges.insert(edge_key(edge)))
    }

    async fn delete_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        Ok(self.inner.edges.remove(&edge_key(edge)).is_some())
    }

    async fn edge_exists(&self, edge: &FollowEdge) -> SocialResult<bool> {
        Ok(self.inner.edges.contains(&edge_key(edge)))
    }

    async fn feed_for(&self, follower_id: &AccountId) -> SocialResult<Vec<FeedItem>> {
        let followees: HashSet<Uuid> = self
            .inner
            .edges
            .iter()
            .filter(|edge| edge.0 == *follower_id.as_uuid())
            .map(|edge| edge.1)
            .collect();

        let mut items: Vec<FeedItem> = self
            .inner
            .recipes
            .iter()
            .filter(|recipe| followees.contains(recipe.author_id.as_uuid()))
            .filter_map(|recipe| {
                let author = self.inner.accounts.get(recipe.author_id.as_uuid())?;
                Some(FeedItem {
                    recipe: recipe.value().clone(),
                    author_name: author.name.clone(),
                })
            })
            .collect();

        items.sort_by(|a, b| {
            b.recipe
                .created_at
                .cmp(&a.recipe.created_at)
                .then_with(|| b.recipe.recipe_id.as_uuid().cmp(a.recipe.recipe_id.as_uuid()))
        });

        Ok(items)
    }
}

fn edge_key(edge: &FollowEdge) -> (Uuid, Uuid) {
    (
        *edge.follower_id().as_uuid(),
        *edge.followee_id().as_uuid(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{AccountName, RecipeDescription, RecipeTitle};
    use platform::password::HashedPassword;

    fn account(email: &str) -> Account {
        Account::new(
            AccountName::new("Ana").unwrap(),
            Email::new(email).unwrap(),
            HashedPassword::from_stored("$argon2id$stub"),
        )
    }

    #[tokio::test]
    async fn test_insert_account_email_unique() {
        let repo = InMemorySocialRepository::new();
        assert!(repo.insert_account(&account("ana@x.com")).await.unwrap());
        assert!(!repo.insert_account(&account("ana@x.com")).await.unwrap());

        let found = repo
            .find_account_by_email(&Email::new("ana@x.com").unwrap())
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_recipe_requires_author() {
        let repo = InMemorySocialRepository::new();
        let recipe = Recipe::new(
            AccountId::generate(),
            RecipeTitle::new("Soup").unwrap(),
            RecipeDescription::new("Boil").unwrap(),
        );
        assert!(matches!(
            repo.insert_recipe(&recipe).await,
            Err(SocialError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn test_edge_requires_both_accounts() {
        let repo = InMemorySocialRepository::new();
        let a = account("a@x.com");
        repo.insert_account(&a).await.unwrap();

        let edge = FollowEdge::new(a.account_id, AccountId::generate()).unwrap();
        assert!(matches!(
            repo.insert_edge(&edge).await,
            Err(SocialError::AccountNotFound)
        ));
        assert_eq!(repo.edge_count(), 0);
    }

    #[tokio::test]
    async fn test_edge_insert_delete() {
        let repo = InMemorySocialRepository::new();
        let (a, b) = (account("a@x.com"), account("b@x.com"));
        repo.insert_account(&a).await.unwrap();
        repo.insert_account(&b).await.unwrap();

        let edge = FollowEdge::new(a.account_id, b.account_id).unwrap();
        assert!(repo.insert_edge(&edge).await.unwrap());
        assert!(!repo.insert_edge(&edge).await.unwrap());
        assert!(repo.edge_exists(&edge).await.unwrap());
        assert!(repo.delete_edge(&edge).await.unwrap());
        assert!(!repo.delete_edge(&edge).await.unwrap());
        assert!(!repo.edge_exists(&edge).await.unwrap());
    }
}
