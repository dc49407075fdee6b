//! PostgreSQL Repository Implementation
//!
//! Parameterized queries only. Uniqueness and self-loop rules are enforced by
//! constraints (see `sql/schema.sql`) and reported back through
//! `ON CONFLICT DO NOTHING` row counts, never by a separate read.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, RecipeId};
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    account::Account, feed::FeedItem, follow_edge::FollowEdge, recipe::Recipe,
};
use crate::domain::repository::{AccountRepository, FollowRepository, RecipeRepository};
use crate::domain::value_object::{AccountName, Email, RecipeDescription, RecipeTitle};
use crate::error::{SocialError, SocialResult};

/// foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// check_violation
const CHECK_VIOLATION: &str = "23514";
/// Self-loop CHECK on follow_edges
const NO_SELF_FOLLOW: &str = "follow_edges_no_self_follow";

/// PostgreSQL-backed social repository
#[derive(Clone)]
pub struct PgSocialRepository {
    pool: PgPool,
}

impl PgSocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate constraint violations into domain errors.
///
/// Anything else stays an opaque storage failure.
fn map_constraint_error(err: sqlx::Error) -> SocialError {
    let (code, constraint) = match err.as_database_error() {
        Some(db) => (
            db.code().map(|code| code.into_owned()),
            db.constraint().map(str::to_owned),
        ),
        None => (None, None),
    };

    constraint_violation(code.as_deref(), constraint.as_deref())
        .unwrap_or(SocialError::StorageUnavailable(err))
}

/// Domain error for a constraint violation, if the SQLSTATE is one we own
fn constraint_violation(code: Option<&str>, constraint: Option<&str>) -> Option<SocialError> {
    match code? {
        FOREIGN_KEY_VIOLATION => Some(SocialError::AccountNotFound),
        CHECK_VIOLATION if constraint == Some(NO_SELF_FOLLOW) => Some(SocialError::SelfFollow),
        CHECK_VIOLATION => Some(SocialError::InvalidInput(
            "Value rejected by a storage constraint".to_string(),
        )),
        _ => None,
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgSocialRepository {
    async fn insert_account(&self, account: &Account) -> SocialResult<bool> {
        // Conflict target is the email only: an id collision must surface as an error
        let inserted = sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                name,
                email,
                password_hash,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.name.as_str())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.created_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted == 1)
    }

    async fn find_account_by_email(&self, email: &Email) -> SocialResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                name,
                email,
                password_hash,
                created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_account))
    }

    async fn find_account_by_id(&self, account_id: &AccountId) -> SocialResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                name,
                email,
                password_hash,
                created_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_account))
    }
}

// ============================================================================
// Recipe Repository Implementation
// ============================================================================

impl RecipeRepository for PgSocialRepository {
    async fn insert_recipe(&self, recipe: &Recipe) -> SocialResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recipes (
                recipe_id,
                author_id,
                title,
                description,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(recipe.recipe_id.as_uuid())
        .bind(recipe.author_id.as_uuid())
        .bind(recipe.title.as_str())
        .bind(recipe.description.as_str())
        .bind(recipe.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_constraint_error)?;

        Ok(())
    }

    async fn find_recipe_by_id(&self, recipe_id: &RecipeId) -> SocialResult<Option<Recipe>> {
        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT
                recipe_id,
                author_id,
                title,
                description,
                created_at
            FROM recipes
            WHERE recipe_id = $1
            "#,
        )
        .bind(recipe_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RecipeRow::into_recipe))
    }
}

// ============================================================================
// Follow Repository Implementation
// ============================================================================

impl FollowRepository for PgSocialRepository {
    async fn insert_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO follow_edges (follower_id, followee_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
        )
        .bind(edge.follower_id().as_uuid())
        .bind(edge.followee_id().as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_constraint_error)?
        .rows_affected();

        Ok(inserted == 1)
    }

    async fn delete_edge(&self, edge: &FollowEdge) -> SocialResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM follow_edges WHERE follower_id = $1 AND followee_id = $2",
        )
        .bind(edge.follower_id().as_uuid())
        .bind(edge.followee_id().as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted == 1)
    }

    async fn edge_exists(&self, edge: &FollowEdge) -> SocialResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM follow_edges
                WHERE follower_id = $1 AND followee_id = $2
            )
            "#,
        )
        .bind(edge.follower_id().as_uuid())
        .bind(edge.followee_id().as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn feed_for(&self, follower_id: &AccountId) -> SocialResult<Vec<FeedItem>> {
        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT
                r.recipe_id,
                r.author_id,
                r.title,
                r.description,
                r.created_at,
                a.name AS author_name
            FROM follow_edges f
            JOIN accounts a ON a.account_id = f.followee_id
            JOIN recipes r ON r.author_id = a.account_id
            WHERE f.follower_id = $1
            ORDER BY r.created_at DESC, r.recipe_id DESC
            "#,
        )
        .bind(follower_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedRow::into_feed_item).collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            account_id: AccountId::from_uuid(self.account_id),
            name: AccountName::from_db(self.name),
            email: Email::from_db(self.email),
            password_hash: HashedPassword::from_stored(self.password_hash),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecipeRow {
    recipe_id: Uuid,
    author_id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl RecipeRow {
    fn into_recipe(self) -> Recipe {
        Recipe {
            recipe_id: RecipeId::from_uuid(self.recipe_id),
            title: RecipeTitle::from_db(self.title),
            description: RecipeDescription::from_db(self.description),
            created_at: self.created_at,
            author_id: AccountId::from_uuid(self.author_id),
        }
    }
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    #[sqlx(flatten)]
    recipe: RecipeRow,
    author_name: String,
}

impl FeedRow {
    fn into_feed_item(self) -> FeedItem {
        FeedItem {
            recipe: self.recipe.into_recipe(),
            author_name: AccountName::from_db(self.author_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_follow_check_maps_to_self_follow() {
        let err = constraint_violation(Some(CHECK_VIOLATION), Some(NO_SELF_FOLLOW));
        assert!(matches!(err, Some(SocialError::SelfFollow)));
    }

    #[test]
    fn test_other_check_maps_to_invalid_input() {
        let err = constraint_violation(Some(CHECK_VIOLATION), Some("recipes_title_check"));
        assert!(matches!(err, Some(SocialError::InvalidInput(_))));

        let err = constraint_violation(Some(CHECK_VIOLATION), None);
        assert!(matches!(err, Some(SocialError::InvalidInput(_))));
    }

    #[test]
    fn test_foreign_key_maps_to_account_not_found() {
        let err = constraint_violation(Some(FOREIGN_KEY_VIOLATION), Some("recipes_author_id_fkey"));
        assert!(matches!(err, Some(SocialError::AccountNotFound)));
    }

    #[test]
    fn test_unowned_codes_fall_through() {
        assert!(constraint_violation(Some("40001"), None).is_none());
        assert!(constraint_violation(None, None).is_none());
        assert!(matches!(
            map_constraint_error(sqlx::Error::PoolTimedOut),
            SocialError::StorageUnavailable(_)
        ));
    }
}
