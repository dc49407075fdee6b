//! Sign Up Use Case
//!
//! Registers an account and returns a token for it.

use std::sync::Arc;

use platform::password::{ClearTextPassword, CredentialManager};
use platform::token::TokenAuthority;

use crate::application::social_graph::SocialGraph;
use crate::domain::repository::{AccountRepository, FollowRepository, RecipeRepository};
use crate::domain::value_object::{AccountName, Email};
use crate::error::{SocialError, SocialResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub token: String,
}

/// Sign up use case
pub struct SignUpUseCase<R> {
    graph: SocialGraph<R>,
    credentials: Arc<CredentialManager>,
    tokens: Arc<TokenAuthority>,
}

impl<R> SignUpUseCase<R>
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

    pub async fn execute(&self, input: SignUpInput) -> SocialResult<SignUpOutput> {
        // Cheap checks first; hashing is the expensive step
        AccountName::new(input.name.as_str())?;
        Email::new(input.email.as_str())?;
        let password = ClearTextPassword::new(input.password)?;

        let credentials = Arc::clone(&self.credentials);
        let password_hash = tokio::task::spawn_blocking(move || credentials.hash(&password))
            .await
            .map_err(|e| SocialError::Internal(format!("Hashing task failed: {}", e)))??;

        let account_id = self
            .graph
            .create_account(&input.name, &input.email, password_hash)
            .await?;

        Ok(SignUpOutput {
            token: self.tokens.issue(account_id.into_uuid()),
        })
    }
}
