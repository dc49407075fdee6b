//! HTTP Handlers

use axum::Json;
use axum::extract::{FromRef, Path, State};
use axum::http::StatusCode;
use std::str::FromStr;
use std::sync::Arc;

use kernel::id::{AccountId, Id};
use platform::password::CredentialManager;
use platform::token::TokenAuthority;

use crate::application::config::SocialConfig;
use crate::application::{SignInInput, SignInUseCase, SignUpInput, SignUpUseCase, SocialGraph};
use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, FollowRepository, RecipeRepository};
use crate::error::{SocialError, SocialResult};
use crate::presentation::dto::{
    CreateRecipeRequest, CreateRecipeResponse, FeedResponse, FollowRequest, FollowingResponse,
    LoginRequest, MessageResponse, ProfileResponse, RecipeResponse, SignUpRequest, TokenResponse,
    UnfollowRequest,
};
use crate::presentation::extractor::AuthenticatedAccount;

/// Shared state for social handlers
#[derive(Clone)]
pub struct SocialAppState<R>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub credentials: Arc<CredentialManager>,
    pub tokens: Arc<TokenAuthority>,
}

impl<R> SocialAppState<R>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: &SocialConfig) -> SocialResult<Self> {
        Ok(Self {
            repo: Arc::new(repo),
            credentials: Arc::new(config.credential_manager()?),
            tokens: Arc::new(config.token_authority()),
        })
    }

    fn graph(&self) -> SocialGraph<R> {
        SocialGraph::new(Arc::clone(&self.repo))
    }
}

/// Account behind a verified token. A valid token for a vanished account is
/// still a bad token.
async fn caller_account<R>(
    state: &SocialAppState<R>,
    account_id: &AccountId,
) -> SocialResult<Account>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    match state.graph().find_account_by_id(account_id).await {
        Err(SocialError::AccountNotFound) => Err(SocialError::InvalidToken),
        other => other,
    }
}

impl<R> FromRef<SocialAppState<R>> for Arc<TokenAuthority>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    fn from_ref(state: &SocialAppState<R>) -> Self {
        Arc::clone(&state.tokens)
    }
}

/// Parse a path or body identifier
fn parse_id<T>(raw: &str) -> SocialResult<Id<T>> {
    Id::from_str(raw).map_err(|_| SocialError::InvalidInput(format!("Invalid id: {}", raw)))
}

// ============================================================================
// Sign Up / Login
// ============================================================================

/// POST /signup
pub async fn sign_up<R>(
    State(state): State<SocialAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> SocialResult<Json<TokenResponse>>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.graph(),
        state.credentials.clone(),
        state.tokens.clone(),
    );

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(TokenResponse {
        token: output.token,
    }))
}

/// POST /login
pub async fn login<R>(
    State(state): State<SocialAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> SocialResult<Json<TokenResponse>>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.graph(),
        state.credentials.clone(),
        state.tokens.clone(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(TokenResponse {
        token: output.token,
    }))
}

// ============================================================================
// Profiles
// ============================================================================

/// GET /user/profile
pub async fn own_profile<R>(
    State(state): State<SocialAppState<R>>,
    AuthenticatedAccount(account_id): AuthenticatedAccount,
) -> SocialResult<Json<ProfileResponse>>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let account = caller_account(&state, &account_id).await?;
    Ok(Json(account.into()))
}

/// GET /user/{id}
pub async fn profile<R>(
    State(state): State<SocialAppState<R>>,
    _caller: AuthenticatedAccount,
    Path(id): Path<String>,
) -> SocialResult<Json<ProfileResponse>>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let account = state.graph().find_account_by_id(&parse_id(&id)?).await?;
    Ok(Json(account.into()))
}

// ============================================================================
// Follow Graph
// ============================================================================

/// POST /user/follow
pub async fn follow<R>(
    State(state): State<SocialAppState<R>>,
    AuthenticatedAccount(account_id): AuthenticatedAccount,
    Json(req): Json<FollowRequest>,
) -> SocialResult<Json<MessageResponse>>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let followee_id = parse_id(&req.user_to_follow_id)?;
    caller_account(&state, &account_id).await?;
    state.graph().follow(account_id, followee_id).await?;

    Ok(Json(MessageResponse {
        message: "Followed successfully".to_string(),
    }))
}

/// POST /user/unfollow
pub async fn unfollow<R>(
    State(state): State<SocialAppState<R>>,
    AuthenticatedAccount(account_id): AuthenticatedAccount,
    Json(req): Json<UnfollowRequest>,
) -> SocialResult<Json<MessageResponse>>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let followee_id = parse_id(&req.user_to_unfollow_id)?;
    state.graph().unfollow(account_id, followee_id).await?;

    Ok(Json(MessageResponse {
        message: "Unfollowed successfully".to_string(),
    }))
}

/// GET /user/following/{id}
pub async fn following<R>(
    State(state): State<SocialAppState<R>>,
    AuthenticatedAccount(account_id): AuthenticatedAccount,
    Path(id): Path<String>,
) -> SocialResult<Json<FollowingResponse>>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let following = state
        .graph()
        .edge_exists(account_id, parse_id(&id)?)
        .await?;

    Ok(Json(FollowingResponse { following }))
}

/// GET /user/feed
pub async fn feed<R>(
    State(state): State<SocialAppState<R>>,
    AuthenticatedAccount(account_id): AuthenticatedAccount,
) -> SocialResult<Json<FeedResponse>>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let items = state.graph().get_feed(&account_id).await?;

    Ok(Json(FeedResponse {
        recipes: items.into_iter().map(Into::into).collect(),
    }))
}

// ============================================================================
// Recipes
// ============================================================================

/// POST /recipe
pub async fn create_recipe<R>(
    State(state): State<SocialAppState<R>>,
    AuthenticatedAccount(account_id): AuthenticatedAccount,
    Json(req): Json<CreateRecipeRequest>,
) -> SocialResult<(StatusCode, Json<CreateRecipeResponse>)>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    caller_account(&state, &account_id).await?;
    let recipe_id = state
        .graph()
        .publish_recipe(account_id, &req.title, &req.description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            id: recipe_id.into_uuid(),
        }),
    ))
}

/// GET /recipe/{id}
pub async fn get_recipe<R>(
    State(state): State<SocialAppState<R>>,
    _caller: AuthenticatedAccount,
    Path(id): Path<String>,
) -> SocialResult<Json<RecipeResponse>>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let recipe = state.graph().get_recipe(&parse_id(&id)?).await?;
    Ok(Json(recipe.into()))
}
