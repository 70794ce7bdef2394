//! # realm-db
//!
//! Database layer implementing the realm-core repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers that validate rows into typed records
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use realm_db::{create_pool, run_migrations, DatabaseConfig, PgChannelRepository};
//! use realm_core::traits::ChannelRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let channels = PgChannelRepository::new(pool).list_visible(None).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    map_db_error, PgChannelRepository, PgMembershipRepository, PgMessageRepository,
    PgProfileRepository, PgReactionRepository,
};
