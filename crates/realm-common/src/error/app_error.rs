//! Process-level errors
//!
//! Raised while booting and by token verification. Each error knows the HTTP
//! status and stable code it renders as, so the API and gateway agree on both.

use realm_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// `(status, code)` pair used in error bodies
    #[must_use]
    pub fn classify(&self) -> (u16, &'static str) {
        match self {
            Self::InvalidToken => (401, "UNAUTHORIZED"),
            Self::TokenExpired => (401, "TOKEN_EXPIRED"),
            Self::Validation(_) => (400, "VALIDATION_FAILED"),
            Self::Database(_) => (500, "STORAGE_UNAVAILABLE"),
            Self::Cache(_) => (500, "CACHE_ERROR"),
            Self::Config(_) => (500, "CONFIG_ERROR"),
            Self::Internal(_) => (500, "INTERNAL_ERROR"),
            Self::Domain(e) => (domain_status(e), e.code()),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.classify().0
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        self.classify().1
    }
}

/// Status for a domain error. Hidden resources are 404 so their existence
/// does not leak.
#[must_use]
pub fn domain_status(err: &DomainError) -> u16 {
    match err {
        e if e.is_not_found() => 404,
        e if e.is_authorization() => 403,
        e if e.is_validation() => 400,
        e if e.is_conflict() => 409,
        _ => 500,
    }
}
