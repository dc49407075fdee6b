//! Signed Bearer Tokens
//!
//! Self-contained tokens binding a subject (account UUID) to an issue time
//! and an optional expiry. Nothing is persisted; validity is a function of
//! the token and the verification keys only.
//!
//! ## Format
//! ```text
//! base64url(claims_json) "." base64url(hmac(claims_b64))
//! ```
//! `claims_json` is `{"sub":"<uuid>","iat":<secs>,"exp":<secs>}`, `exp`
//! being omitted when expiry is disabled.
//!
//! ## Keys
//! Keys come from a [`KeySource`]. The baseline [`StaticKey`] holds one
//! secret injected at startup; a rotating source can sign with the newest
//! key while still accepting the previous ones.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{
    from_base64url, hmac_sha256, hmac_sha512, random_bytes, to_base64url, verify_hmac_sha256,
    verify_hmac_sha512,
};

/// Minimum signing key length in bytes
pub const MIN_KEY_LENGTH: usize = 32;

/// Token failures
///
/// Callers at the service boundary should collapse all of these into a
/// single "invalid token" answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Signing key must be at least {MIN_KEY_LENGTH} bytes (got {0})")]
    KeyTooShort(usize),

    #[error("Signing key is not valid base64")]
    KeyEncoding,

    #[error("Malformed token")]
    Malformed,

    #[error("Token signature does not verify")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token carries no expiry but expiry is enforced")]
    MissingExpiry,
}

// ============================================================================
// Keys
// ============================================================================

/// HMAC secret. Zeroized on drop, redacted in Debug.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(bytes: Vec<u8>) -> Result<Self, TokenError> {
        if bytes.len() < MIN_KEY_LENGTH {
            return Err(TokenError::KeyTooShort(bytes.len()));
        }
        Ok(Self(bytes))
    }

    /// Decode a standard base64 secret (as stored in the environment)
    pub fn from_base64(encoded: &str) -> Result<Self, TokenError> {
        use base64::{Engine, engine::general_purpose::STANDARD};

        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| TokenError::KeyEncoding)?;
        Self::new(bytes)
    }

    /// Random 256-bit key (development and tests)
    pub fn generate() -> Self {
        Self(random_bytes(MIN_KEY_LENGTH))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&"[REDACTED]").finish()
    }
}

/// Source of signing and verification keys.
///
/// This is the extension point for key rotation: implementations may return
/// a new signing key at any time, as long as `verification_keys` still
/// contains every key whose tokens should remain valid.
pub trait KeySource: Send + Sync {
    /// Key used for newly issued tokens
    fn signing_key(&self) -> &SigningKey;

    /// Keys accepted when verifying, newest first
    fn verification_keys(&self) -> &[SigningKey];
}

/// One fixed key for the whole process lifetime
#[derive(Debug, Clone)]
pub struct StaticKey {
    keys: [SigningKey; 1],
}

impl StaticKey {
    pub fn new(key: SigningKey) -> Self {
        Self { keys: [key] }
    }
}

impl KeySource for StaticKey {
    fn signing_key(&self) -> &SigningKey {
        &self.keys[0]
    }

    fn verification_keys(&self) -> &[SigningKey] {
        &self.keys
    }
}

// ============================================================================
// Authority
// ============================================================================

/// MAC algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenAlgorithm {
    #[default]
    Hs256,
    Hs512,
}

impl TokenAlgorithm {
    fn sign(self, key: &SigningKey, data: &[u8]) -> Vec<u8> {
        match self {
            TokenAlgorithm::Hs256 => hmac_sha256(key.as_bytes(), data),
            TokenAlgorithm::Hs512 => hmac_sha512(key.as_bytes(), data),
        }
    }

    fn verify(self, key: &SigningKey, data: &[u8], tag: &[u8]) -> bool {
        match self {
            TokenAlgorithm::Hs256 => verify_hmac_sha256(key.as_bytes(), data, tag),
            TokenAlgorithm::Hs512 => verify_hmac_sha512(key.as_bytes(), data, tag),
        }
    }
}

impl std::str::FromStr for TokenAlgorithm {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(TokenAlgorithm::Hs256),
            "HS512" => Ok(TokenAlgorithm::Hs512),
            _ => Err(TokenError::Malformed),
        }
    }
}

/// Token policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub algorithm: TokenAlgorithm,
    /// `None` disables expiry
    pub ttl: Option<Duration>,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            algorithm: TokenAlgorithm::Hs256,
            ttl: Some(Duration::from_secs(24 * 3600)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Issues and verifies tokens
pub struct TokenAuthority<K: KeySource = StaticKey> {
    keys: K,
    policy: TokenPolicy,
}

impl TokenAuthority<StaticKey> {
    /// Authority over a single injected key
    pub fn with_key(key: SigningKey, policy: TokenPolicy) -> Self {
        Self::new(StaticKey::new(key), policy)
    }
}

impl<K: KeySource> TokenAuthority<K> {
    pub fn new(keys: K, policy: TokenPolicy) -> Self {
        Self { keys, policy }
    }

    /// Issue a token for `subject`
    pub fn issue(&self, subject: Uuid) -> String {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    fn issue_at(&self, subject: Uuid, now: i64) -> String {
        let ttl_secs = self
            .policy
            .ttl
            .map(|ttl| i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX));
        let claims = Claims {
            sub: subject,
            iat: now,
            exp: ttl_secs.map(|ttl| now.saturating_add(ttl)),
        };

        // Claims hold a UUID and integers only; serialization cannot fail.
        let json = serde_json::to_vec(&claims).unwrap_or_default();
        let payload = to_base64url(&json);
        let tag = self
            .policy
            .algorithm
            .sign(self.keys.signing_key(), payload.as_bytes());

        format!("{}.{}", payload, to_base64url(&tag))
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Uuid, TokenError> {
        let (payload, signature) = token.trim().split_once('.').ok_or(TokenError::Malformed)?;
        if payload.is_empty() || signature.contains('.') {
            return Err(TokenError::Malformed);
        }

        let tag = from_base64url(signature).map_err(|_| TokenError::Malformed)?;

        let signed_by_known_key = self
            .keys
            .verification_keys()
            .iter()
            .any(|key| self.policy.algorithm.verify(key, payload.as_bytes(), &tag));
        if !signed_by_known_key {
            return Err(TokenError::BadSignature);
        }

        let json = from_base64url(payload).map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

        match claims.exp {
            Some(exp) if now >= exp => Err(TokenError::Expired),
            None if self.policy.ttl.is_some() => Err(TokenError::MissingExpiry),
            _ => Ok(claims.sub),
        }
    }
}

impl<K: KeySource + fmt::Debug> fmt::Debug for TokenAuthority<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("keys", &self.keys)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> SigningKey {
        SigningKey::new(vec![byte; 32]).unwrap()
    }

    fn authority(byte: u8, ttl: Option<Duration>) -> TokenAuthority {
        TokenAuthority::with_key(
            key(byte),
            TokenPolicy {
                algorithm: TokenAlgorithm::Hs256,
                ttl,
            },
        )
    }

    #[test]
    fn test_roundtrip() {
        let authority = authority(7, Some(Duration::from_secs(60)));
        let subject = Uuid::new_v4();
        let token = authority.issue(subject);
        assert_eq!(authority.verify(&token), Ok(subject));
    }

    #[test]
    fn test_roundtrip_hs512_without_expiry() {
        let authority = TokenAuthority::with_key(
            key(7),
            TokenPolicy {
                algorithm: TokenAlgorithm::Hs512,
                ttl: None,
            },
        );
        let subject = Uuid::new_v4();
        let token = authority.issue(subject);
        assert_eq!(authority.verify(&token), Ok(subject));
    }

    #[test]
    fn test_other_key_rejected() {
        let token = authority(1, None).issue(Uuid::new_v4());
        assert_eq!(authority(2, None).verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let token = authority(1, None).issue(Uuid::new_v4());
        let hs512 = TokenAuthority::with_key(
            key(1),
            TokenPolicy {
                algorithm: TokenAlgorithm::Hs512,
                ttl: None,
            },
        );
        assert_eq!(hs512.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let authority = authority(1, None);
        let token = authority.issue(Uuid::new_v4());
        let (_, signature) = token.split_once('.').unwrap();

        let forged_claims = format!(r#"{{"sub":"{}","iat":0}}"#, Uuid::new_v4());
        let forged = format!("{}.{}", to_base64url(forged_claims.as_bytes()), signature);
        assert_eq!(authority.verify(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let authority = authority(1, None);
        for token in ["", ".", "abc", "abc.", ".abc", "a.b.c", "!!!.???"] {
            assert!(authority.verify(token).is_err(), "token {token:?} verified");
        }
    }

    #[test]
    fn test_corrupted_token_rejected() {
        let authority = authority(1, None);
        let mut token = authority.issue(Uuid::new_v4()).into_bytes();
        let last = token.len() - 1;
        token[last] = if token[last] == b'A' { b'B' } else { b'A' };
        let token = String::from_utf8(token).unwrap();
        assert!(authority.verify(&token).is_err());
    }

    #[test]
    fn test_expiry() {
        let authority = authority(1, Some(Duration::from_secs(60)));
        let subject = Uuid::new_v4();
        let token = authority.issue_at(subject, 1_000);

        assert_eq!(authority.verify_at(&token, 1_059), Ok(subject));
        assert_eq!(authority.verify_at(&token, 1_060), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_without_expiry_rejected_once_enforced() {
        let token = authority(1, None).issue(Uuid::new_v4());
        let enforcing = authority(1, Some(Duration::from_secs(60)));
        assert_eq!(enforcing.verify(&token), Err(TokenError::MissingExpiry));
    }

    #[test]
    fn test_rotating_source_accepts_previous_key() {
        struct Rotated {
            keys: Vec<SigningKey>,
        }

        impl KeySource for Rotated {
            fn signing_key(&self) -> &SigningKey {
                &self.keys[0]
            }

            fn verification_keys(&self) -> &[SigningKey] {
                &self.keys
            }
        }

        let old = authority(1, None);
        let token = old.issue(Uuid::new_v4());

        let rotated = TokenAuthority::new(
            Rotated {
                keys: vec![key(2), key(1)],
            },
            TokenPolicy {
                algorithm: TokenAlgorithm::Hs256,
                ttl: None,
            },
        );
        assert!(rotated.verify(&token).is_ok());
        assert!(old.verify(&rotated.issue(Uuid::new_v4())).is_err());
    }

    #[test]
    fn test_key_validation() {
        assert_eq!(SigningKey::new(vec![0; 16]).unwrap_err(), TokenError::KeyTooShort(16));
        assert_eq!(SigningKey::from_base64("***").unwrap_err(), TokenError::KeyEncoding);
        assert!(SigningKey::from_base64(&base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            [9u8; 32]
        ))
        .is_ok());
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("hs256".parse(), Ok(TokenAlgorithm::Hs256));
        assert_eq!("HS512".parse(), Ok(TokenAlgorithm::Hs512));
        assert!("none".parse::<TokenAlgorithm>().is_err());
    }

    #[test]
    fn test_key_debug_redacted() {
        assert!(format!("{:?}", key(1)).contains("REDACTED"));
    }
}
