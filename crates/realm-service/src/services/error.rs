//! Service layer errors

use realm_common::{domain_status, AppError};
use realm_core::{AccessDenial, DomainError};
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Rule violation or storage failure reported by the domain
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    App(#[from] AppError),

    /// Input rejected before any storage access
    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_schema_not_provisioned(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_schema_not_provisioned())
    }
}

impl From<AccessDenial> for ServiceError {
    fn from(denial: AccessDenial) -> Self {
        Self::Domain(denial.into())
    }
}

/// Keeps the first message of a failed `validate()`, visiting fields in name
/// order so the choice is stable
impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        let message = fields
            .iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_deref().map(str::to_owned))
            .unwrap_or_else(|| "Invalid request".to_owned());

        Self::Validation(message)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => Self::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Validation(msg) => Self::Validation(msg),
            ServiceError::Internal(msg) => Self::Internal(anyhow::anyhow!(msg)),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use realm_core::Snowflake;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(max = 3, message = "too long"))]
        name: String,
    }

    #[test]
    fn test_hidden_channel_is_not_found() {
        let err: ServiceError = AccessDenial::ChannelHidden(Snowflake::new(1)).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_CHANNEL");
    }

    #[test]
    fn test_insufficient_role_is_forbidden() {
        let err: ServiceError = AccessDenial::InsufficientRole.into();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
    }

    #[test]
    fn test_validation_error() {
        let err = ServiceError::validation("Message content is required");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert_eq!(err.to_string(), "Message content is required");
    }

    #[test]
    fn test_validator_message_is_surfaced() {
        let probe = Probe {
            name: "neon-city".to_string(),
        };
        let err: ServiceError = probe.validate().unwrap_err().into();
        assert_eq!(err.to_string(), "too long");
    }

    #[test]
    fn test_conflict_and_storage_codes() {
        let err: ServiceError = DomainError::ChannelNameTaken("General".into()).into();
        assert_eq!(err.status_code(), 409);

        let err: ServiceError = DomainError::SchemaNotProvisioned("channels".into()).into();
        assert_eq!(err.status_code(), 500);
        assert!(err.is_schema_not_provisioned());
    }

    #[test]
    fn test_convert_to_app_error() {
        let service_err: ServiceError = DomainError::MessageNotFound(Snowflake::new(3)).into();
        let app_err: AppError = service_err.into();
        assert_eq!(app_err.status_code(), 404);
        assert_eq!(app_err.error_code(), "UNKNOWN_MESSAGE");
    }
}
