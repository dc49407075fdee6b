//! Rendering [`AppError`] at the HTTP boundary.

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for super::app_error::AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 problem details, plus a machine-readable code
        let body = serde_json::json!({
            "type": "about:blank",
            "title": self.kind().as_str(),
            "status": status.as_u16(),
            "code": self.kind(),
            "detail": self.message(),
            "action": self.action(),
        });

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(body),
        )
            .into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use crate::error::{app_error::AppError, kind::ErrorKind};
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;

    #[test]
    fn test_problem_response() {
        let response = AppError::new(ErrorKind::Conflict, "Already following").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );

        let response =
            AppError::new(ErrorKind::ServiceUnavailable, "Storage unavailable").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
