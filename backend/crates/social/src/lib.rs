//! Social (Identity & Social Graph) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the social graph manager
//! - `infra/` - PostgreSQL and in-memory gateways
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Account registration and email/password login
//! - Signed bearer tokens with optional expiry
//! - Recipe publishing
//! - Follow/unfollow with at-most-one edge per ordered pair
//! - Feed of recipes by followed accounts, newest first
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Unknown email and wrong password are indistinguishable to callers
//! - Storage errors are logged, never rendered

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::SocialConfig;
pub use application::social_graph::SocialGraph;
pub use error::{SocialError, SocialResult};
pub use infra::{memory::InMemorySocialRepository, postgres::PgSocialRepository};
pub use presentation::router::social_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::{
        account::Account, feed::FeedItem, follow_edge::FollowEdge, recipe::Recipe,
    };
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
