//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod channels;
pub mod health;
pub mod members;
pub mod messages;
pub mod reactions;

use realm_core::Snowflake;
use realm_service::ServiceResult;
use tracing::warn;

use crate::response::ApiResult;

/// Serve an empty listing when the store has no schema yet.
///
/// Only list reads degrade; every other failure, and every other kind of
/// storage failure, is returned to the client.
pub(crate) fn degrade_on_missing_schema<T: Default>(
    result: ServiceResult<T>,
    operation: &'static str,
    actor: Option<Snowflake>,
) -> ApiResult<T> {
    match result {
        Err(e) if e.is_schema_not_provisioned() => {
            warn!(
                operation,
                actor = ?actor,
                error = %e,
                "Storage schema not provisioned; serving empty result"
            );
            Ok(T::default())
        }
        other => Ok(other?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realm_core::DomainError;
    use realm_service::ServiceError;

    #[test]
    fn test_missing_schema_degrades_to_empty() {
        let result: ServiceResult<Vec<u32>> = Err(ServiceError::from(
            DomainError::SchemaNotProvisioned("relation \"channels\" does not exist".into()),
        ));
        let degraded = degrade_on_missing_schema(result, "list_channels", None).unwrap();
        assert!(degraded.is_empty());
    }

    #[test]
    fn test_other_storage_failures_propagate() {
        let result: ServiceResult<Vec<u32>> = Err(ServiceError::from(
            DomainError::StorageUnavailable("connection refused".into()),
        ));
        let err = degrade_on_missing_schema(result, "list_messages", Some(Snowflake::new(7)))
            .unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_UNAVAILABLE");
    }

    #[test]
    fn test_success_passes_through() {
        let result: ServiceResult<Vec<u32>> = Ok(vec![1, 2]);
        assert_eq!(
            degrade_on_missing_schema(result, "list_channels", None).unwrap(),
            vec![1, 2]
        );
    }
}
