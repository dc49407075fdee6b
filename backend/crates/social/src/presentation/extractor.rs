//! Bearer Token Extractor
//!
//! Resolves the calling account from the `Authorization` header. Both
//! `Bearer <token>` and a bare token are accepted.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, header, request::Parts};
use kernel::id::AccountId;
use platform::token::TokenAuthority;

use crate::error::SocialError;

const BEARER_SCHEME: &str = "bearer";

/// The account a verified token was issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount(pub AccountId);

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    Arc<TokenAuthority>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SocialError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers).ok_or(SocialError::InvalidToken)?;
        let tokens = Arc::<TokenAuthority>::from_ref(state);
        let subject = tokens.verify(token)?;
        Ok(Self(AccountId::from_uuid(subject)))
    }
}

/// Token from `Authorization`, with or without the `Bearer` scheme
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();

    let token = match value.get(..BEARER_SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => {
            let rest = &value[BEARER_SCHEME.len()..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim_start()
            } else {
                // A raw token that happens to start with "bearer"
                value
            }
        }
        _ => value,
    };

    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_scheme() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer(&headers("bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer(&headers("BEARER   abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_raw_token() {
        assert_eq!(extract_bearer(&headers("abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_missing_or_empty() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
        assert_eq!(extract_bearer(&headers("Bearer ")), None);
        assert_eq!(extract_bearer(&headers("")), None);
    }
}
