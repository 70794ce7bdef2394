//! Redis Pub/Sub module.
//!
//! Carries domain events from the API process to every gateway node.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, BROADCAST_CHANNEL, CHANNEL_PREFIX};
pub use publisher::{topic_for, PubSubEvent, Publisher};
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberConfig, SubscriberError, SubscriberResult,
};
