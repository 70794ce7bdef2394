//! Outbound half of the fan-out
//!
//! Channel-scoped events go to `channel:{id}` so only nodes with subscribers
//! receive them; channel list changes go to the broadcast topic.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use realm_core::DomainEvent;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire envelope shared by publisher and subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Dispatch name, e.g. `MESSAGE_CREATE`
    pub event_type: String,
    /// Forwarded verbatim as the dispatch `d`
    pub data: Value,
}

impl PubSubEvent {
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// Topic a domain event belongs on
#[must_use]
pub fn topic_for(event: &DomainEvent) -> PubSubChannel {
    if event.is_control_plane() {
        PubSubChannel::broadcast()
    } else {
        PubSubChannel::channel(event.channel_id())
    }
}

#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Returns how many listeners Redis delivered to
    pub async fn publish(&self, topic: PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let mut conn = self.pool.get().await?;
        let receivers: u32 = conn.publish(topic.name(), payload).await?;

        tracing::debug!(
            topic = %topic,
            event_type = %event.event_type,
            receivers,
            "Published event"
        );
        Ok(receivers)
    }

    /// Publish `data` under the event's name on the event's topic
    pub async fn publish_domain_event(&self, event: &DomainEvent, data: Value) -> RedisResult<u32> {
        self.publish(topic_for(event), &PubSubEvent::new(event.event_type(), data))
            .await
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Publisher").field(&self.pool).finish()
    }
}
