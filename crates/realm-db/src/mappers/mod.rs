//! Entity to model mappers
//!
//! Conversions between domain entities (realm-core) and database models.
//! - `TryFrom<Model> for Entity`: rows are validated into typed records; a value
//!   outside an entity's closed set is reported instead of silently defaulted
//! - `*Insert` structs: prepare entity data for database operations

mod channel;
mod membership;
mod message;
mod profile;
mod reaction;

use realm_core::error::DomainError;

pub use message::MessageInsert;

/// Error for a stored value that does not map onto the domain model
pub(crate) fn corrupt_row(table: &str, column: &str, value: &str) -> DomainError {
    DomainError::InternalError(format!("Unexpected {table}.{column} value '{value}'"))
}
