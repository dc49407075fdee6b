//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the bearer token extractor.

pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod router;

pub use extractor::AuthenticatedAccount;
pub use handlers::SocialAppState;
pub use router::social_router;
