//! # realm-cache
//!
//! Redis connection pooling and pub/sub transport for channel events.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Domain events fanned out across server instances, one topic
//!   per chat channel plus a broadcast topic for channel list changes
//!
//! ## Example
//!
//! ```ignore
//! use realm_cache::{Publisher, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = Publisher::new(pool);
//!
//! // Routed to `channel:{id}` or `broadcast` depending on the event
//! publisher.publish_domain_event(&event, payload).await?;
//! ```

pub mod pool;
pub mod pubsub;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};

// Re-export pubsub types
pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, ReceivedMessage, Subscriber,
    SubscriberConfig, SubscriberError, SubscriberResult, BROADCAST_CHANNEL, CHANNEL_PREFIX,
};
