//! HTTP Error Handling
//!
//! 校验错误 -> 400，核心错误 -> 500，响应体 `{"detail": "..."}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::SynthesisError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse::new(detail))).into_response()
    }
}

// 核心层的 UnsupportedLocale 仍映射为 500；边界校验已先行返回 400
impl From<SynthesisError> for ApiError {
    fn from(e: SynthesisError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnsupportedLocaleError;

    #[test]
    fn test_status_codes() {
        let response = ApiError::BadRequest("Text cannot be empty".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_core_unsupported_locale_is_internal() {
        let err: ApiError =
            SynthesisError::from(UnsupportedLocaleError("fr-FR".to_string())).into();
        match err {
            ApiError::Internal(msg) => assert_eq!(msg, "Unsupported locale: fr-FR"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
