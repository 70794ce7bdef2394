//! Error rendering and response helpers
//!
//! Every failure leaves the API as `{"error": {"code", "message"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use realm_common::AppError;
use realm_service::ServiceError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Path, query or body that failed to parse
    #[error("{0}")]
    BadRequest(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Invalid or expired token")]
    InvalidToken,
}

impl ApiError {
    fn classify(&self) -> (StatusCode, &'static str) {
        let status =
            |code: u16| StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match self {
            Self::App(e) => (status(e.status_code()), e.error_code()),
            Self::Service(e) => (status(e.status_code()), e.error_code()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            Self::MissingAuth => (StatusCode::UNAUTHORIZED, "MISSING_AUTHORIZATION"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        self.classify().1
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Server-side failures never reveal their cause
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_owned()
        } else {
            self.to_string()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = ?self, code, "Request failed");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message: self.public_message(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 201 wrapper around any response
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, self.0).into_response()
    }
}
