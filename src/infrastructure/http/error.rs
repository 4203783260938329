//! HTTP Error Handling
//!
//! 应用层错误到 HTTP 状态码的映射，响应体为统一的 `{errno, error, data}` 信封，errno 与状态码一致

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    UnprocessableEntity(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::UnprocessableEntity(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errno = i32::from(status.as_u16());

        if status.is_server_error() {
            tracing::error!(errno, error = %self.message(), "Request failed");
        } else {
            tracing::warn!(errno, error = %self.message(), "Request rejected");
        }

        let body = ErrorResponse::new(errno, self.message());
        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        let message = e.to_string();
        match e {
            ApplicationError::ValidationError { .. } => ApiError::BadRequest(message),
            ApplicationError::NotFound { .. } => ApiError::NotFound(message),
            ApplicationError::Forbidden(_) => ApiError::Forbidden(message),
            ApplicationError::InvalidAudio(_) => ApiError::UnprocessableEntity(message),
            ApplicationError::EngineBusy { .. } | ApplicationError::EngineUnavailable(_) => {
                ApiError::ServiceUnavailable(message)
            }
            ApplicationError::SynthesisError(_)
            | ApplicationError::StorageError(_)
            | ApplicationError::InternalError(_) => ApiError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::InvalidAudioReason;

    #[test]
    fn test_application_error_mapping() {
        let cases = [
            (ApplicationError::validation("text", "empty"), StatusCode::BAD_REQUEST),
            (ApplicationError::not_found("Voice", "x"), StatusCode::NOT_FOUND),
            (ApplicationError::Forbidden("builtin".into()), StatusCode::FORBIDDEN),
            (
                ApplicationError::InvalidAudio(InvalidAudioReason::Empty),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApplicationError::EngineBusy { waited_ms: 10 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApplicationError::EngineUnavailable("not loaded".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApplicationError::SynthesisError("oom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApplicationError::StorageError("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_errno_matches_status() {
        let response = ApiError::Forbidden("no".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
