//! Error handling utilities for repositories

use realm_core::error::DomainError;
use sqlx::Error as SqlxError;

/// SQLSTATE for a relation that does not exist
const UNDEFINED_TABLE: &str = "42P01";

/// Convert SQLx error to DomainError
///
/// A missing table becomes [`DomainError::SchemaNotProvisioned`] so the API
/// layer can tell an unmigrated store from an unreachable one.
pub fn map_db_error(e: SqlxError) -> DomainError {
    let code = e
        .as_database_error()
        .and_then(|db_err| db_err.code().map(|c| c.into_owned()));
    classify(code.as_deref(), e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

fn classify(code: Option<&str>, message: String) -> DomainError {
    match code {
        Some(UNDEFINED_TABLE) => DomainError::SchemaNotProvisioned(message),
        _ => DomainError::StorageUnavailable(message),
    }
}
