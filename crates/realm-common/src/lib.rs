//! # realm-common
//!
//! Shared utilities including configuration, error handling, token verification, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService};
pub use config::{
    AppConfig, AppSettings, BootstrapConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, HubConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig,
    SnowflakeConfig,
};
pub use error::{domain_status, AppError};
pub use telemetry::{init_tracing, LogFormat, TracingConfig, TracingError};
