//! Sign In Use Case
//!
//! Authenticates by email and password and returns a token.
//!
//! An unknown email and a wrong password produce the same
//! `InvalidCredentials` error. Storage failures are still surfaced as such.

use std::sync::Arc;

use platform::password::{ClearTextPassword, CredentialManager};
use platform::token::TokenAuthority;

use crate::application::social_graph::SocialGraph;
use crate::domain::repository::{AccountRepository, FollowRepository, RecipeRepository};
use crate::domain::value_object::Email;
use crate::error::{SocialError, SocialResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub token: String,
}

/// Sign in use case
pub struct SignInUseCase<R> {
    graph: SocialGraph<R>,
    credentials: Arc<CredentialManager>,
    tokens: Arc<TokenAuthority>,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Send + Sync,
{
    pub fn new(
        graph: SocialGraph<R>,
        credentials: Arc<CredentialManager>,
        tokens: Arc<TokenAuthority>,
    ) -> Self {
        Self {
            graph,
            credentials,
            tokens,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> SocialResult<SignInOutput> {
        let email = Email::new(input.email).map_err(|_| SocialError::InvalidCredentials)?;

        let account = match self.graph.find_account_by_email(&email).await {
            Ok(account) => account,
            Err(SocialError::AccountNotFound) => return Err(SocialError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        // No policy check here: it may have changed since the password was set
        let password = ClearTextPassword::normalized(input.password);

        let credentials = Arc::clone(&self.credentials);
        let digest = account.password_hash.clone();
        let (valid, stale) = tokio::task::spawn_blocking(move || {
            let valid = credentials.verify(&password, &digest);
            (valid, valid && credentials.needs_rehash(&digest))
        })
        .await
        .map_err(|e| SocialError::Internal(format!("Verification task failed: {}", e)))?;

        if !valid {
            return Err(SocialError::InvalidCredentials);
        }

        if stale {
            tracing::info!(
                account_id = %account.account_id,
                "Password digest uses outdated parameters"
            );
        }

        tracing::info!(account_id = %account.account_id, "Account signed in");

        Ok(SignInOutput {
            token: self.tokens.issue(account.account_id.into_uuid()),
        })
    }
}
