//! Infrastructure Layer
//!
//! Persistence gateway implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemorySocialRepository;
pub use postgres::PgSocialRepository;
