//! Social Error Types
//!
//! Domain failures of the identity and social-graph core. Every variant maps
//! onto a `kernel::error::kind::ErrorKind` and renders as an `AppError`;
//! storage details never reach the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Social-specific result type alias
pub type SocialResult<T> = Result<T, SocialError>;

/// Social-specific error variants
#[derive(Debug, Error)]
pub enum SocialError {
    /// Email already registered
    #[error("Email is already registered")]
    DuplicateEmail,

    /// Input failed a shape check
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Recipe not found")]
    RecipeNotFound,

    /// An account cannot follow itself
    #[error("Accounts cannot follow themselves")]
    SelfFollow,

    #[error("Already following this account")]
    AlreadyFollowing,

    #[error("Not following this account")]
    NotFollowing,

    /// Bearer token missing, malformed, forged or expired
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Persistence gateway failure. The source is logged, never rendered.
    #[error("Storage unavailable")]
    StorageUnavailable(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SocialError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SocialError::DuplicateEmail
            | SocialError::AlreadyFollowing
            | SocialError::NotFollowing => ErrorKind::Conflict,
            SocialError::InvalidInput(_) => ErrorKind::BadRequest,
            SocialError::AccountNotFound | SocialError::RecipeNotFound => ErrorKind::NotFound,
            SocialError::SelfFollow => ErrorKind::UnprocessableEntity,
            SocialError::InvalidToken | SocialError::InvalidCredentials => {
                ErrorKind::Unauthorized
            }
            SocialError::StorageUnavailable(_) => ErrorKind::ServiceUnavailable,
            SocialError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            SocialError::Internal(_) => AppError::internal("Internal error"),
            SocialError::InvalidToken => AppError::unauthorized(self.to_string())
                .with_action("Please log in again"),
            SocialError::InvalidCredentials => AppError::unauthorized(self.to_string())
                .with_action("Check your email and password"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SocialError::StorageUnavailable(e) => {
                tracing::error!(error = %e, "Social storage error");
            }
            SocialError::Internal(msg) => {
                tracing::error!(message = %msg, "Social internal error");
            }
            SocialError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            SocialError::InvalidToken => {
                tracing::warn!("Rejected bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Social error");
            }
        }
    }
}

impl IntoResponse for SocialError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects report shape violations as `AppError`s.
impl From<AppError> for SocialError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                SocialError::InvalidInput(err.message().to_string())
            }
            _ => SocialError::Internal(err.to_string()),
        }
    }
}

impl From<platform::token::TokenError> for SocialError {
    fn from(err: platform::token::TokenError) -> Self {
        tracing::debug!(reason = %err, "Token verification failed");
        SocialError::InvalidToken
    }
}

impl From<platform::password::PasswordPolicyError> for SocialError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        SocialError::InvalidInput(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for SocialError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        SocialError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(SocialError, StatusCode)> = vec![
            (SocialError::DuplicateEmail, StatusCode::CONFLICT),
            (SocialError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (SocialError::AccountNotFound, StatusCode::NOT_FOUND),
            (SocialError::RecipeNotFound, StatusCode::NOT_FOUND),
            (SocialError::SelfFollow, StatusCode::UNPROCESSABLE_ENTITY),
            (SocialError::AlreadyFollowing, StatusCode::CONFLICT),
            (SocialError::NotFollowing, StatusCode::CONFLICT),
            (SocialError::InvalidToken, StatusCode::UNAUTHORIZED),
            (SocialError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                SocialError::StorageUnavailable(sqlx::Error::PoolTimedOut),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                SocialError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.status_code(), expected_status);
            assert_eq!(error.into_response().status(), expected_status);
        }
    }

    #[test]
    fn test_storage_details_not_rendered() {
        let err = SocialError::StorageUnavailable(sqlx::Error::Protocol(
            "relation \"follow_edges\" does not exist".into(),
        ));
        let app_err = err.to_app_error();
        assert_eq!(app_err.message(), "Storage unavailable");
        assert!(!app_err.to_string().contains("follow_edges"));
    }

    #[test]
    fn test_internal_details_not_rendered() {
        let app_err = SocialError::Internal("argon2 params".into()).to_app_error();
        assert!(!app_err.message().contains("argon2"));
    }

    #[test]
    fn test_app_error_conversion() {
        let err: SocialError = AppError::bad_request("Title cannot be empty").into();
        assert!(matches!(err, SocialError::InvalidInput(msg) if msg == "Title cannot be empty"));

        let err: SocialError = AppError::internal("nope").into();
        assert!(matches!(err, SocialError::Internal(_)));
    }

    #[test]
    fn test_token_errors_collapse() {
        let err: SocialError = platform::token::TokenError::Expired.into();
        assert!(matches!(err, SocialError::InvalidToken));
    }
}
