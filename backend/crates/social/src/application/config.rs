//! Application Configuration
//!
//! Secrets and cost parameters for the identity core. Everything here is
//! passed in explicitly at construction; nothing is read from ambient
//! process state.

use std::fmt;
use std::time::Duration;

use platform::password::{CredentialManager, WorkFactor};
use platform::token::{SigningKey, TokenAuthority, TokenPolicy};

use crate::error::SocialResult;

/// Social application configuration
#[derive(Clone)]
pub struct SocialConfig {
    /// Token signing key (at least 32 bytes)
    pub token_key: SigningKey,
    /// Token algorithm and lifetime
    pub token_policy: TokenPolicy,
    /// Argon2id cost parameters
    pub work_factor: WorkFactor,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            token_key: SigningKey::generate(),
            token_policy: TokenPolicy::default(),
            work_factor: WorkFactor::default(),
            password_pepper: None,
        }
    }
}

impl SocialConfig {
    /// Create config with an explicit signing key
    pub fn with_key(token_key: SigningKey) -> Self {
        Self {
            token_key,
            ..Default::default()
        }
    }

    /// Create config with a random signing key.
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        Self::with_key(SigningKey::generate())
    }

    /// Create config for development (random key, week-long tokens)
    pub fn development() -> Self {
        let mut config = Self::with_random_secret();
        config.token_policy.ttl = Some(Duration::from_secs(7 * 24 * 3600));
        config
    }

    /// Deterministic key and the cheapest Argon2 parameters. Tests only.
    pub fn testing() -> Self {
        Self {
            token_key: SigningKey::new(vec![7u8; 32]).expect("fixed key is 32 bytes"),
            work_factor: WorkFactor::minimal(),
            ..Default::default()
        }
    }

    /// Build the credential manager
    pub fn credential_manager(&self) -> SocialResult<CredentialManager> {
        Ok(CredentialManager::new(
            self.work_factor,
            self.password_pepper.clone(),
        )?)
    }

    /// Build the token authority
    pub fn token_authority(&self) -> TokenAuthority {
        TokenAuthority::with_key(self.token_key.clone(), self.token_policy)
    }
}

impl fmt::Debug for SocialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocialConfig")
            .field("token_key", &self.token_key)
            .field("token_policy", &self.token_policy)
            .field("work_factor", &self.work_factor)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testing_config_is_deterministic() {
        let a = SocialConfig::testing().token_authority();
        let b = SocialConfig::testing().token_authority();
        let subject = uuid::Uuid::new_v4();
        assert_eq!(b.verify(&a.issue(subject)).unwrap(), subject);
    }

    #[test]
    fn test_random_secrets_differ() {
        let a = SocialConfig::with_random_secret().token_authority();
        let b = SocialConfig::with_random_secret().token_authority();
        assert!(b.verify(&a.issue(uuid::Uuid::new_v4())).is_err());
    }

    #[test]
    fn test_development_ttl() {
        let config = SocialConfig::development();
        assert_eq!(
            config.token_policy.ttl,
            Some(Duration::from_secs(7 * 24 * 3600))
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = SocialConfig {
            password_pepper: Some(b"pepper-value".to_vec()),
            ..SocialConfig::testing()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("pepper-value"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_credential_manager_uses_work_factor() {
        let manager = SocialConfig::testing().credential_manager().unwrap();
        assert_eq!(manager.work_factor(), WorkFactor::minimal());
    }
}
