//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC, Base64url, secure randomness)
//! - Password hashing (Argon2id with a tunable work factor)
//! - Signed, self-contained bearer tokens
//!
//! Everything here is CPU-bound and stateless: no I/O, no locking.

pub mod crypto;
pub mod password;
pub mod token;
