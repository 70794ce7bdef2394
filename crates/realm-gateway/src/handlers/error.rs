//! Op handler failures and the close code each one maps to

use crate::protocol::CloseCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(#[source] realm_common::AppError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Already authenticated")]
    AlreadyAuthenticated,

    /// An outbound dispatch body did not serialize
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl HandlerError {
    #[must_use]
    pub fn close_code(&self) -> CloseCode {
        match self {
            Self::InvalidPayload(_) => CloseCode::DecodeError,
            Self::AuthenticationFailed(_) => CloseCode::AuthenticationFailed,
            Self::NotAuthenticated => CloseCode::NotAuthenticated,
            Self::AlreadyAuthenticated => CloseCode::AlreadyAuthenticated,
            Self::Encode(_) => CloseCode::UnknownError,
        }
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;
