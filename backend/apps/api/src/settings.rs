//! Process Settings
//!
//! Environment-driven startup configuration. Everything is read once in
//! `main` and passed down explicitly.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, bail};
use platform::token::{SigningKey, TokenAlgorithm};
use social::SocialConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug)]
pub struct Settings {
    /// `None` selects the in-memory gateway
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub social: SocialConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), cfg!(debug_assertions))
    }

    /// `allow_random_secret` permits a missing `TOKEN_SECRET` (debug builds)
    pub fn from_lookup<F>(lookup: F, allow_random_secret: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut social = match var("TOKEN_SECRET") {
            Some(secret) => SocialConfig::with_key(
                SigningKey::from_base64(secret.trim())
                    .context("TOKEN_SECRET must be base64 of at least 32 bytes")?,
            ),
            None if allow_random_secret => {
                tracing::warn!("TOKEN_SECRET not set, using a random key; tokens will not survive a restart");
                SocialConfig::development()
            }
            None => bail!("TOKEN_SECRET must be set in production"),
        };

        if let Some(algorithm) = var("TOKEN_ALGORITHM") {
            social.token_policy.algorithm = algorithm
                .parse::<TokenAlgorithm>()
                .context("TOKEN_ALGORITHM must be HS256 or HS512")?;
        }

        if let Some(ttl) = var("TOKEN_TTL_SECS") {
            let secs: u64 = ttl
                .trim()
                .parse()
                .context("TOKEN_TTL_SECS must be a whole number of seconds")?;
            social.token_policy.ttl = (secs > 0).then(|| Duration::from_secs(secs));
        }

        social.password_pepper = var("PASSWORD_PEPPER").map(String::into_bytes);

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(n) => n
                .trim()
                .parse::<NonZeroU32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?
                .get(),
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: var("DATABASE_URL"),
            max_connections,
            bind_addr,
            frontend_origins,
            social,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

    fn settings(vars: &[(&str, &str)], allow_random: bool) -> anyhow::Result<Settings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned(), allow_random)
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[("TOKEN_SECRET", SECRET)], false).unwrap();
        assert!(s.database_url.is_none());
        assert_eq!(s.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(s.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(s.frontend_origins.len(), 2);
        assert!(s.social.token_policy.ttl.is_some());
        assert!(s.social.password_pepper.is_none());
    }

    #[test]
    fn test_secret_required_in_production() {
        assert!(settings(&[], false).is_err());
        assert!(settings(&[], true).is_ok());
        assert!(settings(&[("TOKEN_SECRET", "c2hvcnQ=")], true).is_err());
    }

    #[test]
    fn test_token_overrides() {
        let s = settings(
            &[
                ("TOKEN_SECRET", SECRET),
                ("TOKEN_ALGORITHM", "hs512"),
                ("TOKEN_TTL_SECS", "0"),
            ],
            false,
        )
        .unwrap();
        assert_eq!(s.social.token_policy.algorithm, TokenAlgorithm::Hs512);
        assert_eq!(s.social.token_policy.ttl, None);

        let s = settings(&[("TOKEN_SECRET", SECRET), ("TOKEN_TTL_SECS", "60")], false).unwrap();
        assert_eq!(s.social.token_policy.ttl, Some(Duration::from_secs(60)));

        assert!(settings(&[("TOKEN_SECRET", SECRET), ("TOKEN_TTL_SECS", "soon")], false).is_err());
        assert!(settings(&[("TOKEN_SECRET", SECRET), ("TOKEN_ALGORITHM", "RS256")], false).is_err());
    }

    #[test]
    fn test_database_and_origins() {
        let s = settings(
            &[
                ("TOKEN_SECRET", SECRET),
                ("DATABASE_URL", "postgres://localhost/recipes"),
                ("FRONTEND_ORIGINS", "https://a.example, ,https://b.example"),
                ("PASSWORD_PEPPER", "pepper"),
            ],
            false,
        )
        .unwrap();
        assert_eq!(s.database_url.as_deref(), Some("postgres://localhost/recipes"));
        assert_eq!(s.frontend_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(s.social.password_pepper.as_deref(), Some(&b"pepper"[..]));
    }

    #[test]
    fn test_max_connections_must_be_positive() {
        let s = settings(&[("TOKEN_SECRET", SECRET), ("DATABASE_MAX_CONNECTIONS", "12")], false)
            .unwrap();
        assert_eq!(s.max_connections, 12);

        assert!(settings(&[("TOKEN_SECRET", SECRET), ("DATABASE_MAX_CONNECTIONS", "0")], false).is_err());
        assert!(settings(&[("TOKEN_SECRET", SECRET), ("DATABASE_MAX_CONNECTIONS", "-3")], false).is_err());
    }
}
