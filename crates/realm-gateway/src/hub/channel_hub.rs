//! Channel Subscription Hub
//!
//! Tracks which connections listen to which channel and fans published
//! frames out to them. Each channel has its own lock guarding both its
//! subscriber list and its fan-out, so publishes to one channel are
//! delivered in call order while unrelated channels never contend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use realm_core::Snowflake;
use serde_json::json;
use tokio::sync::mpsc;

use super::queue::{OutboundQueue, PushOutcome};
use crate::events::GatewayEventType;
use crate::protocol::GatewayMessage;

/// Whether a channel currently has listeners on this node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    Active,
}

/// Lifecycle of one subscription
///
/// `Disconnected` is terminal: subscribing again yields a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    Connecting,
    Subscribed,
    Disconnected,
}

/// Idle/Active transitions, emitted in the order they happen per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicChange {
    Activated(Snowflake),
    Deactivated(Snowflake),
}

/// Token identifying one connection's subscription to one channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: u64,
    channel_id: Snowflake,
    session_id: String,
}

impl SubscriptionHandle {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn channel_id(&self) -> Snowflake {
        self.channel_id
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[derive(Debug)]
struct SubscriberEntry {
    handle_id: u64,
    session_id: String,
    queue: Arc<OutboundQueue>,
}

#[derive(Debug, Default)]
struct ChannelSlot {
    subscribers: Vec<SubscriberEntry>,
    /// Set once the slot has gone idle and been unlinked from the map
    closed: bool,
}

type SharedSlot = Arc<Mutex<ChannelSlot>>;

/// In-process registry of channel subscriptions
pub struct ChannelHub {
    channels: DashMap<Snowflake, SharedSlot>,
    next_handle: AtomicU64,
    topic_tx: Option<mpsc::UnboundedSender<TopicChange>>,
}

impl ChannelHub {
    /// Create a hub that does not report topic changes
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
            next_handle: AtomicU64::new(1),
            topic_tx: None,
        }
    }

    /// Create a hub that reports Idle/Active transitions on `topic_tx`
    #[must_use]
    pub fn with_topic_listener(topic_tx: mpsc::UnboundedSender<TopicChange>) -> Self {
        Self {
            topic_tx: Some(topic_tx),
            ..Self::new()
        }
    }

    fn emit(&self, change: TopicChange) {
        if let Some(tx) = &self.topic_tx {
            if tx.send(change).is_err() {
                tracing::warn!(?change, "Topic listener is gone");
            }
        }
    }

    fn slot(&self, channel_id: Snowflake) -> Option<SharedSlot> {
        self.channels.get(&channel_id).map(|slot| Arc::clone(slot.value()))
    }

    fn unlink(&self, channel_id: Snowflake, slot: &SharedSlot) {
        self.channels
            .remove_if(&channel_id, |_, existing| Arc::ptr_eq(existing, slot));
    }

    /// Subscribe a connection to a channel.
    ///
    /// A connection that is already subscribed gets its existing handle back,
    /// so every frame still reaches it once.
    pub fn subscribe(
        &self,
        channel_id: Snowflake,
        session_id: &str,
        queue: Arc<OutboundQueue>,
    ) -> SubscriptionHandle {
        loop {
            let slot = Arc::clone(self.channels.entry(channel_id).or_default().value());
            let mut guard = slot.lock();

            // Lost a race with the last unsubscribe; that slot is on its way out
            if guard.closed {
                drop(guard);
                self.unlink(channel_id, &slot);
                continue;
            }

            if let Some(existing) = guard.subscribers.iter().find(|s| s.session_id == session_id) {
                return SubscriptionHandle {
                    id: existing.handle_id,
                    channel_id,
                    session_id: existing.session_id.clone(),
                };
            }

            let was_idle = guard.subscribers.is_empty();
            let handle_id = self.next_handle.fetch_add(1, Ordering::Relaxed);
            guard.subscribers.push(SubscriberEntry {
                handle_id,
                session_id: session_id.to_string(),
                queue,
            });

            if was_idle {
                self.emit(TopicChange::Activated(channel_id));
            }

            tracing::debug!(
                channel_id = %channel_id,
                session_id = %session_id,
                subscribers = guard.subscribers.len(),
                "Subscribed to channel"
            );

            return SubscriptionHandle {
                id: handle_id,
                channel_id,
                session_id: session_id.to_string(),
            };
        }
    }

    /// Stop deliveries for a handle. Returns false if it was already gone.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        let Some(slot) = self.slot(handle.channel_id) else {
            return false;
        };
        let mut guard = slot.lock();

        let before = guard.subscribers.len();
        guard.subscribers.retain(|s| s.handle_id != handle.id);
        let removed = guard.subscribers.len() != before;

        if removed && guard.subscribers.is_empty() {
            guard.closed = true;
            self.emit(TopicChange::Deactivated(handle.channel_id));
            self.unlink(handle.channel_id, &slot);
        }

        if removed {
            tracing::debug!(
                channel_id = %handle.channel_id,
                session_id = %handle.session_id,
                "Unsubscribed from channel"
            );
        }

        removed
    }

    /// Deliver a frame to everyone subscribed to `channel_id` right now.
    ///
    /// Returns the number of queues the frame was placed in.
    pub fn publish(&self, channel_id: Snowflake, message: &GatewayMessage) -> usize {
        let Some(slot) = self.slot(channel_id) else {
            return 0;
        };
        let guard = slot.lock();

        let mut delivered = 0;
        for subscriber in &guard.subscribers {
            match subscriber.queue.push(message.clone()) {
                PushOutcome::Queued => delivered += 1,
                PushOutcome::DroppedOldest => {
                    delivered += 1;
                    tracing::warn!(
                        channel_id = %channel_id,
                        session_id = %subscriber.session_id,
                        dropped = subscriber.queue.dropped(),
                        "Outbound queue full, dropped oldest frame"
                    );
                }
                PushOutcome::Closed => {}
            }
        }

        tracing::trace!(channel_id = %channel_id, delivered, "Published to channel");
        delivered
    }

    /// Drop every subscription to a channel that no longer exists,
    /// telling each subscriber why.
    pub fn evict_channel(&self, channel_id: Snowflake, reason: &str) -> usize {
        let Some(slot) = self.slot(channel_id) else {
            return 0;
        };
        let mut guard = slot.lock();
        if guard.closed {
            return 0;
        }

        let notice = GatewayMessage::dispatch(
            GatewayEventType::Unsubscribed.as_str(),
            json!({ "channel_id": channel_id.to_string(), "reason": reason }),
        );
        let evicted = std::mem::take(&mut guard.subscribers);
        for subscriber in &evicted {
            subscriber.queue.push(notice.clone());
        }

        guard.closed = true;
        self.emit(TopicChange::Deactivated(channel_id));
        self.unlink(channel_id, &slot);

        tracing::info!(channel_id = %channel_id, evicted = evicted.len(), "Channel evicted");
        evicted.len()
    }

    /// Current state of a subscription
    #[must_use]
    pub fn subscriber_state(&self, handle: &SubscriptionHandle) -> SubscriberState {
        let subscribed = self.slot(handle.channel_id).is_some_and(|slot| {
            slot.lock()
                .subscribers
                .iter()
                .any(|s| s.handle_id == handle.id)
        });

        if subscribed {
            SubscriberState::Subscribed
        } else {
            SubscriberState::Disconnected
        }
    }

    #[must_use]
    pub fn channel_state(&self, channel_id: Snowflake) -> ChannelState {
        if self.subscriber_count(channel_id) > 0 {
            ChannelState::Active
        } else {
            ChannelState::Idle
        }
    }

    #[must_use]
    pub fn subscriber_count(&self, channel_id: Snowflake) -> usize {
        self.slot(channel_id)
            .map_or(0, |slot| slot.lock().subscribers.len())
    }

    /// Channels with at least one subscriber
    #[must_use]
    pub fn active_channels(&self) -> Vec<Snowflake> {
        self.channels.iter().map(|entry| *entry.key()).collect()
    }
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChannelHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelHub")
            .field("active_channels", &self.channels.len())
            .finish()
    }
}
