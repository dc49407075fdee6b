//! Password Hashing and Verification
//!
//! One-way password storage with:
//! - Argon2id hashing with a tunable work factor
//! - Random per-hash salt embedded in the PHC output string
//! - Zeroization of clear text in memory
//! - Constant-time verification
//!
//! ## Failure policy
//! [`CredentialManager::verify`] never returns an error. A stored digest
//! that cannot be parsed verifies as `false`, so corrupt credential data is
//! never mistaken for a correct password.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in code points
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length in code points
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password shape violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Work factor outside what Argon2 accepts
    #[error("Invalid Argon2 work factor: {0}")]
    InvalidWorkFactor(String),

    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Unicode is NFKC-normalized so visually identical input hashes the same
/// - Does not implement `Clone`
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password for registration, enforcing the minimal shape policy:
    /// - 6..=128 code points
    /// - not empty or whitespace only
    /// - no control characters (space, tab and newline are allowed)
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::normalized(raw);

        if password.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = password.0.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if password
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(password)
    }

    /// Normalize without applying the policy.
    ///
    /// Used for login attempts: a policy change must never lock out
    /// passwords that were valid when they were set.
    pub fn normalized(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.0.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Password digest in PHC string format
///
/// The string embeds algorithm, version, work factor, salt and hash, so a
/// digest stays verifiable after the configured work factor changes.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a digest loaded from storage.
    ///
    /// Not validated: a malformed value simply never verifies.
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Credential Manager
// ============================================================================

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for WorkFactor {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl WorkFactor {
    /// Smallest parameters Argon2 accepts. Tests only.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

/// Hashes and verifies passwords.
///
/// Pure: no I/O and no shared mutable state, so one instance can be used
/// from any number of threads. Hashing is deliberately slow; async callers
/// should run it on a blocking thread.
#[derive(Clone)]
pub struct CredentialManager {
    argon2: Argon2<'static>,
    work_factor: WorkFactor,
    pepper: Option<Vec<u8>>,
}

impl CredentialManager {
    /// Build a manager from a work factor and an optional pepper
    /// (application-wide secret appended to every password).
    pub fn new(work_factor: WorkFactor, pepper: Option<Vec<u8>>) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            work_factor.memory_kib,
            work_factor.iterations,
            work_factor.parallelism,
            None,
        )
        .map_err(|e| PasswordHashError::InvalidWorkFactor(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            work_factor,
            pepper,
        })
    }

    pub fn work_factor(&self) -> WorkFactor {
        self.work_factor
    }

    /// Hash a password with a fresh random salt (128 bits).
    ///
    /// Two calls with the same password produce different digests.
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let mut bytes = password.peppered(self.pepper.as_deref());
        let salt = SaltString::generate(OsRng);

        let result = self
            .argon2
            .hash_password(&bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        bytes.zeroize();
        result
    }

    /// Verify a password against a stored digest.
    ///
    /// Uses the salt and parameters embedded in `digest`; the comparison is
    /// constant time. Malformed digests yield `false`.
    pub fn verify(&self, password: &ClearTextPassword, digest: &HashedPassword) -> bool {
        let parsed_hash = match PasswordHash::new(digest.as_phc_string()) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let mut bytes = password.peppered(self.pepper.as_deref());
        let valid = self.argon2.verify_password(&bytes, &parsed_hash).is_ok();
        bytes.zeroize();
        valid
    }

    /// Whether a digest was produced with another algorithm or a weaker
    /// work factor than the one configured now.
    pub fn needs_rehash(&self, digest: &HashedPassword) -> bool {
        let parsed_hash = match PasswordHash::new(digest.as_phc_string()) {
            Ok(h) => h,
            Err(_) => return true,
        };

        if parsed_hash.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }

        match Params::try_from(&parsed_hash) {
            Ok(params) => {
                params.m_cost() < self.work_factor.memory_kib
                    || params.t_cost() < self.work_factor.iterations
                    || params.p_cost() < self.work_factor.parallelism
            }
            Err(_) => true,
        }
    }
}

impl fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialManager")
            .field("work_factor", &self.work_factor)
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
