//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its state.

use crate::hub::{OutboundQueue, PushOutcome, SubscriberState, SubscriptionHandle};
use crate::protocol::{CloseCode, GatewayMessage};
use parking_lot::RwLock;
use realm_core::Snowflake;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Connection established, waiting for Identify
    Connecting,
    /// Successfully authenticated
    Connected,
    /// Connection is being closed
    Disconnecting,
    /// Connection is closed
    Disconnected,
}

/// A single WebSocket connection
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Authenticated user ID (None until Identify)
    user_id: RwLock<Option<Snowflake>>,

    /// Current connection state
    state: RwLock<ConnectionState>,

    /// Frames waiting for the socket writer
    queue: Arc<OutboundQueue>,

    /// Last sequence number sent
    sequence: AtomicU64,

    /// Last heartbeat received
    last_heartbeat: RwLock<Instant>,

    /// Live subscriptions by channel
    subscriptions: RwLock<HashMap<Snowflake, SubscriptionHandle>>,

    /// Channels whose subscribe request is still being checked
    pending: RwLock<HashSet<Snowflake>>,

    /// Close code to report when the socket is shut by the server
    close_code: RwLock<Option<CloseCode>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(session_id: String, queue_capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            user_id: RwLock::new(None),
            state: RwLock::new(ConnectionState::Connecting),
            queue: Arc::new(OutboundQueue::new(queue_capacity)),
            sequence: AtomicU64::new(0),
            last_heartbeat: RwLock::new(Instant::now()),
            subscriptions: RwLock::new(HashMap::new()),
            pending: RwLock::new(HashSet::new()),
            close_code: RwLock::new(None),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the user ID (if authenticated)
    pub fn user_id(&self) -> Option<Snowflake> {
        *self.user_id.read()
    }

    /// Bind the connection to a user. Returns false if it was already bound.
    pub fn identify(&self, user_id: Snowflake) -> bool {
        let mut current = self.user_id.write();
        if current.is_some() {
            return false;
        }
        *current = Some(user_id);
        *self.state.write() = ConnectionState::Connected;
        true
    }

    /// Get the current state
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Set the connection state
    pub fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }

    /// Check if the connection is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.user_id.read().is_some()
    }

    /// Get the next sequence number
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get the current sequence number
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Record a heartbeat received
    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.write() = Instant::now();
    }

    /// Get time since last heartbeat
    pub fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.read().elapsed()
    }

    // === Subscriptions ===

    /// Mark a subscribe request as in flight. Returns false if one already is.
    pub fn begin_subscribe(&self, channel_id: Snowflake) -> bool {
        self.pending.write().insert(channel_id)
    }

    /// Abandon an in-flight subscribe request
    pub fn cancel_subscribe(&self, channel_id: Snowflake) {
        self.pending.write().remove(&channel_id);
    }

    /// Record a completed subscription
    pub fn track(&self, handle: SubscriptionHandle) {
        let channel_id = handle.channel_id();
        self.subscriptions.write().insert(channel_id, handle);
        self.pending.write().remove(&channel_id);
    }

    /// Forget a subscription, returning its handle
    pub fn untrack(&self, channel_id: Snowflake) -> Option<SubscriptionHandle> {
        self.subscriptions.write().remove(&channel_id)
    }

    /// Forget every subscription, returning their handles
    pub fn take_subscriptions(&self) -> Vec<SubscriptionHandle> {
        self.pending.write().clear();
        self.subscriptions
            .write()
            .drain()
            .map(|(_, handle)| handle)
            .collect()
    }

    /// Channels this connection is subscribed to
    pub fn subscribed_channels(&self) -> Vec<Snowflake> {
        self.subscriptions.read().keys().copied().collect()
    }

    /// Where this connection stands with a channel
    pub fn subscription_state(&self, channel_id: Snowflake) -> SubscriberState {
        if self.subscriptions.read().contains_key(&channel_id) {
            SubscriberState::Subscribed
        } else if self.pending.read().contains(&channel_id) {
            SubscriberState::Connecting
        } else {
            SubscriberState::Disconnected
        }
    }

    // === Outbound ===

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Queue a message for this connection
    pub fn send(&self, message: GatewayMessage) -> PushOutcome {
        self.queue.push(message)
    }

    /// The outbound queue, shared with the hub
    pub fn queue(&self) -> Arc<OutboundQueue> {
        Arc::clone(&self.queue)
    }

    /// Stop accepting outbound frames
    pub fn close(&self) {
        self.set_state(ConnectionState::Disconnected);
        self.queue.close();
    }

    /// Close with a gateway close code; the first code recorded wins
    pub fn close_with(&self, code: CloseCode) {
        self.close_code.write().get_or_insert(code);
        self.close();
    }

    /// Close code recorded by `close_with`
    pub fn close_code(&self) -> Option<CloseCode> {
        *self.close_code.read()
    }

    /// Check if the outbound queue is closed
    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id())
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .field("subscriptions", &self.subscriptions.read().len())
            .field("created_at", &self.created_at)
            .finish()
    }
}
