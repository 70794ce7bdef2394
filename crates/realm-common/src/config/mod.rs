//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BootstrapConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, HubConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig,
    SnowflakeConfig,
};
