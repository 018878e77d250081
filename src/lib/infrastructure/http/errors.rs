//! API error-handling module

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{
    emails::{errors::EmailError, EmailAddressError},
    history::errors::GetHistoryError,
    templates::errors::{
        CreateTemplateError, DeleteTemplateError, GetTemplateError, InvalidTemplateError,
        UpdateTemplateError,
    },
};

/// Message returned for failures whose details stay in the logs
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// An error response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// The error message
    #[schema(example = "Template 'welcome' not found")]
    pub error: String,
}

/// An error raised in the API
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApiError {
    /// The status code
    #[schema(example = 500, value_type = u16)]
    #[serde(with = "http_serde::status_code")]
    pub status: StatusCode,

    /// The error message
    #[schema(example = "An unexpected error occurred")]
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    /// Create a new bad request error
    pub fn new_400(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a new unauthorized error
    pub fn new_401(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn new_404(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn new_409(message: &str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Create new internal server error
    pub fn new_500(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Create a new service unavailable error
    pub fn new_503(message: &str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });

        if self.status == StatusCode::UNAUTHORIZED {
            return (self.status, [(header::WWW_AUTHENTICATE, "Basic")], body).into_response();
        }

        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        unknown_error(err)
    }
}

impl From<EmailAddressError> for ApiError {
    fn from(err: EmailAddressError) -> Self {
        match err {
            EmailAddressError::EmptyEmailAddress => {
                ApiError::new_400("Please provide an email address")
            }
            EmailAddressError::InvalidEmailAddress(email) => {
                ApiError::new_400(&format!("\"{email}\" is not a valid email address"))
            }
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::ConnectionFailed(_) => ApiError::new_503(&err.to_string()),
            EmailError::SendFailed(_) => ApiError::new_500(&err.to_string()),
            EmailError::TemplateNotFound(_) => ApiError::new_404(&err.to_string()),
            EmailError::TemplateRender { .. } => ApiError::new_500(&err.to_string()),
            EmailError::InvalidInput(message) => ApiError::new_400(&message),
            EmailError::UnknownError(err) => unknown_error(err),
        }
    }
}

impl From<InvalidTemplateError> for ApiError {
    fn from(err: InvalidTemplateError) -> Self {
        ApiError::new_400(&err.to_string())
    }
}

impl From<GetTemplateError> for ApiError {
    fn from(err: GetTemplateError) -> Self {
        match err {
            GetTemplateError::TemplateNotFound(_) => ApiError::new_404(&err.to_string()),
            GetTemplateError::UnknownError(err) => unknown_error(err),
        }
    }
}

impl From<CreateTemplateError> for ApiError {
    fn from(err: CreateTemplateError) -> Self {
        match err {
            CreateTemplateError::DuplicateTemplate(_) => ApiError::new_409(&err.to_string()),
            CreateTemplateError::UnknownError(err) => unknown_error(err),
        }
    }
}

impl From<UpdateTemplateError> for ApiError {
    fn from(err: UpdateTemplateError) -> Self {
        match err {
            UpdateTemplateError::TemplateNotFound(_) => ApiError::new_404(&err.to_string()),
            UpdateTemplateError::DuplicateTemplate(_) => ApiError::new_409(&err.to_string()),
            UpdateTemplateError::UnknownError(err) => unknown_error(err),
        }
    }
}

impl From<DeleteTemplateError> for ApiError {
    fn from(err: DeleteTemplateError) -> Self {
        match err {
            DeleteTemplateError::TemplateNotFound(_) => ApiError::new_404(&err.to_string()),
            DeleteTemplateError::UnknownError(err) => unknown_error(err),
        }
    }
}

impl From<GetHistoryError> for ApiError {
    fn from(err: GetHistoryError) -> Self {
        match err {
            GetHistoryError::RecordNotFound(_) => ApiError::new_404(&err.to_string()),
            GetHistoryError::UnknownError(err) => unknown_error(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new_400(&rejection.body_text())
    }
}

fn unknown_error(err: anyhow::Error) -> ApiError {
    error!("unexpected error: {err:?}");

    ApiError::new_500(UNKNOWN_ERROR_MESSAGE)
}

#[cfg(test)]
mod tests {
    use std::usize;

    use anyhow::anyhow;
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn test_error_response() -> TestResult {
        let error = ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        };

        let response = error.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;

        assert_eq!(body, r#"{"error":"Internal server error"}"#);

        Ok(())
    }

    #[test]
    fn test_unauthorized_response_has_challenge() {
        let response = ApiError::new_401("Invalid credentials").into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).map(|v| v.as_bytes()),
            Some("Basic".as_bytes())
        );
    }

    #[test]
    fn test_api_error_from_anyhow_hides_details() {
        let api_error = ApiError::from(anyhow!("password authentication failed for user"));

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_email_error_status_codes() {
        let cases = [
            (
                EmailError::ConnectionFailed("refused".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                EmailError::SendFailed("550".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                EmailError::TemplateNotFound("missing".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                EmailError::TemplateRender {
                    name: "broken".to_string(),
                    reason: "syntax error".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                EmailError::InvalidInput("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                EmailError::UnknownError(anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_template_errors() {
        let not_found = ApiError::from(GetTemplateError::TemplateNotFound("x".to_string()));
        let duplicate = ApiError::from(CreateTemplateError::DuplicateTemplate("x".to_string()));

        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.message, "Template 'x' not found");
        assert_eq!(duplicate.status, StatusCode::CONFLICT);
        assert_eq!(duplicate.message, "Template 'x' already exists");
    }
}
