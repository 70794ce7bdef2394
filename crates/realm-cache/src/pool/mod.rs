//! Pooled Redis connections

mod redis_pool;

pub(crate) use redis_pool::redact_url;
pub use redis_pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};
