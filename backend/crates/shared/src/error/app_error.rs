//! Application Error
//!
//! [`AppError`] is what crosses the HTTP boundary: a classification plus a
//! caller-facing message. Crate-specific error enums convert into it at the
//! edge, so storage and crypto details never reach a response body.

use std::borrow::Cow;
use std::fmt;

use super::kind::ErrorKind;

/// Unified application error.
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::NotFound, "Account not found");
/// assert_eq!(err.status_code(), 404);
///
/// let err = AppError::bad_request("Title cannot be empty")
///     .with_action("Please enter a title");
/// assert_eq!(err.action(), Some("Please enter a title"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
        }
    }

    /// Shape check failed on caller input
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// The message is rendered as-is; keep internals out of it
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// Attach a suggested next step for the caller
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_classify() {
        let err = AppError::new(ErrorKind::NotFound, "Recipe not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Recipe not found");
        assert!(err.action().is_none());

        assert_eq!(AppError::bad_request("x").status_code(), 400);
        assert_eq!(AppError::unauthorized("x").status_code(), 401);
        assert_eq!(AppError::internal("x").status_code(), 500);
    }

    #[test]
    fn test_display_includes_action() {
        let err = AppError::new(ErrorKind::NotFound, "Account not found");
        assert_eq!(err.to_string(), "[Not Found] Account not found");

        let err = AppError::bad_request("Invalid email").with_action("Enter a valid email");
        assert_eq!(
            err.to_string(),
            "[Bad Request] Invalid email (Action: Enter a valid email)"
        );
    }
}
