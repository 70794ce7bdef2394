//! Channel Subscription Hub
//!
//! Per-channel fan-out with bounded per-connection queues, plus the
//! debouncer that turns channel list changes into refresh signals.

mod channel_hub;
mod debounce;
mod queue;

pub use channel_hub::{ChannelHub, ChannelState, SubscriberState, SubscriptionHandle, TopicChange};
pub use debounce::{Debouncer, DEFAULT_CONTROL_DEBOUNCE};
pub use queue::{OutboundQueue, PushOutcome, DEFAULT_QUEUE_CAPACITY};
