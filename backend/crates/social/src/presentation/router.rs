//! Social Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::config::SocialConfig;
use crate::domain::repository::{AccountRepository, FollowRepository, RecipeRepository};
use crate::error::SocialResult;
use crate::presentation::handlers::{self, SocialAppState};

/// Create the social router for any repository implementation
pub fn social_router<R>(repo: R, config: &SocialConfig) -> SocialResult<Router>
where
    R: AccountRepository + RecipeRepository + FollowRepository + Clone + Send + Sync + 'static,
{
    let state = SocialAppState::new(repo, config)?;

    Ok(Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/user/profile", get(handlers::own_profile::<R>))
        .route("/user/feed", get(handlers::feed::<R>))
        .route("/user/follow", post(handlers::follow::<R>))
        .route("/user/unfollow", post(handlers::unfollow::<R>))
        .route("/user/following/{id}", get(handlers::following::<R>))
        .route("/user/{id}", get(handlers::profile::<R>))
        .route("/recipe", post(handlers::create_recipe::<R>))
        .route("/recipe/{id}", get(handlers::get_recipe::<R>))
        .with_state(state))
}
