//! Redis Pub/Sub subscriber.
//!
//! One dedicated pub/sub connection per gateway node. Received payloads are
//! fanned out over a tokio broadcast channel. The set of followed topics is
//! owned by the listener task and changed through a command channel, so a
//! reconnect always re-follows exactly the topics that were live before it.

use crate::pubsub::{PubSubChannel, PubSubEvent};
use futures_util::StreamExt;
use redis::aio::PubSub;
use redis::Client;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Error type for subscriber operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Subscriber task has stopped")]
    Stopped,
}

/// Result type for subscriber operations
pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// A message received on one of our topics
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Topic the message arrived on
    pub channel: PubSubChannel,
    /// Decoded event, when the payload is a valid envelope
    pub event: Option<PubSubEvent>,
    /// Raw payload
    pub payload: String,
}

impl ReceivedMessage {
    /// Build from a raw Redis delivery; topics outside our naming scheme yield `None`
    fn from_redis(topic: &str, payload: String) -> Option<Self> {
        let channel = PubSubChannel::parse(topic)?;
        let event = PubSubEvent::from_json(&payload).ok();

        Some(Self {
            channel,
            event,
            payload,
        })
    }
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Capacity of the broadcast channel handed to receivers
    pub broadcast_buffer: usize,
    /// First delay before reconnecting after a lost connection
    pub reconnect_delay_ms: u64,
    /// Upper bound for the doubling reconnect delay
    pub max_reconnect_delay_ms: u64,
}

impl SubscriberConfig {
    /// Delay before reconnect attempt `attempt` (0-based)
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(16);
        let delay = self
            .reconnect_delay_ms
            .saturating_mul(factor)
            .min(self.max_reconnect_delay_ms.max(self.reconnect_delay_ms));
        Duration::from_millis(delay)
    }
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 500,
            max_reconnect_delay_ms: 10_000,
        }
    }
}

impl From<&realm_common::RedisConfig> for SubscriberConfig {
    fn from(config: &realm_common::RedisConfig) -> Self {
        Self {
            redis_url: config.url.clone(),
            ..Self::default()
        }
    }
}

/// Topic changes sent to the listener task
#[derive(Debug)]
enum TopicCommand {
    Follow(PubSubChannel),
    Unfollow(PubSubChannel),
    Shutdown,
}

/// How a listener session ended
enum SessionEnd {
    Shutdown,
    Lost,
}

/// State shared between the handle and the listener task
#[derive(Debug, Default)]
struct ListenerStats {
    connected: AtomicBool,
    received: AtomicU64,
}

/// Redis Pub/Sub subscriber handle
pub struct Subscriber {
    events_tx: broadcast::Sender<ReceivedMessage>,
    commands: mpsc::UnboundedSender<TopicCommand>,
    stats: Arc<ListenerStats>,
}

impl Subscriber {
    /// Start the listener task, following `initial` topics from the first connection on
    pub fn spawn(config: SubscriberConfig, initial: &[PubSubChannel]) -> SubscriberResult<Self> {
        // Fail fast on a malformed URL instead of retrying it forever
        let client = Client::open(config.redis_url.as_str())?;

        let (events_tx, _) = broadcast::channel(config.broadcast_buffer.max(1));
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let stats = Arc::new(ListenerStats::default());

        let listener = Listener {
            client,
            config,
            topics: initial.iter().copied().collect(),
            events_tx: events_tx.clone(),
            stats: stats.clone(),
        };
        tokio::spawn(listener.run(commands_rx));

        Ok(Self {
            events_tx,
            commands,
            stats,
        })
    }

    /// Start receiving messages published on `topic`
    pub fn follow(&self, topic: PubSubChannel) -> SubscriberResult<()> {
        self.send(TopicCommand::Follow(topic))
    }

    /// Stop receiving messages published on `topic`
    pub fn unfollow(&self, topic: PubSubChannel) -> SubscriberResult<()> {
        self.send(TopicCommand::Unfollow(topic))
    }

    /// Stop the listener task
    pub fn shutdown(&self) -> SubscriberResult<()> {
        self.send(TopicCommand::Shutdown)
    }

    /// Get a receiver for incoming messages
    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedMessage> {
        self.events_tx.subscribe()
    }

    /// Whether the listener currently holds a live Redis connection
    pub fn is_connected(&self) -> bool {
        self.stats.connected.load(Ordering::Relaxed)
    }

    /// Messages received on known topics since start
    pub fn received_count(&self) -> u64 {
        self.stats.received.load(Ordering::Relaxed)
    }

    fn send(&self, command: TopicCommand) -> SubscriberResult<()> {
        self.commands
            .send(command)
            .map_err(|_| SubscriberError::Stopped)
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("connected", &self.is_connected())
            .field("received", &self.received_count())
            .field("receivers", &self.events_tx.receiver_count())
            .finish()
    }
}

/// Listener task state
struct Listener {
    client: Client,
    config: SubscriberConfig,
    topics: HashSet<PubSubChannel>,
    events_tx: broadcast::Sender<ReceivedMessage>,
    stats: Arc<ListenerStats>,
}

impl Listener {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<TopicCommand>) {
        let mut attempt = 0u32;

        loop {
            let end = match self.connect().await {
                Ok(pubsub) => {
                    attempt = 0;
                    self.session(pubsub, &mut commands).await
                }
                Err(e) => {
                    tracing::error!(error = %e, "Subscriber failed to connect");
                    SessionEnd::Lost
                }
            };
            self.stats.connected.store(false, Ordering::Relaxed);

            if matches!(end, SessionEnd::Shutdown) {
                tracing::info!("Subscriber shutting down");
                return;
            }

            let delay = self.config.backoff(attempt);
            attempt = attempt.saturating_add(1);
            tracing::warn!(delay_ms = delay.as_millis(), "Subscriber reconnecting");

            // Topic changes made while disconnected still count
            let sleep = tokio::time::sleep(delay);
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    () = &mut sleep => break,
                    cmd = commands.recv() => match cmd {
                        Some(TopicCommand::Follow(topic)) => { self.topics.insert(topic); }
                        Some(TopicCommand::Unfollow(topic)) => { self.topics.remove(&topic); }
                        Some(TopicCommand::Shutdown) | None => return,
                    },
                }
            }
        }
    }

    /// Open a pub/sub connection and follow every known topic
    async fn connect(&self) -> SubscriberResult<PubSub> {
        let mut pubsub = self.client.get_async_pubsub().await?;
        for topic in &self.topics {
            pubsub.subscribe(topic.name()).await?;
        }

        self.stats.connected.store(true, Ordering::Relaxed);
        tracing::info!(
            url = %crate::pool::redact_url(&self.config.redis_url),
            topics = self.topics.len(),
            "Subscriber connected to Redis"
        );
        Ok(pubsub)
    }

    /// Deliver messages until the connection drops or shutdown is requested
    async fn session(
        &mut self,
        mut pubsub: PubSub,
        commands: &mut mpsc::UnboundedReceiver<TopicCommand>,
    ) -> SessionEnd {
        loop {
            // The message stream borrows the connection; it is rebuilt after each topic change
            let command = {
                let mut stream = pubsub.on_message();
                loop {
                    tokio::select! {
                        msg = stream.next() => match msg {
                            Some(msg) => self.deliver(&msg),
                            None => {
                                tracing::warn!("Pub/Sub stream ended");
                                return SessionEnd::Lost;
                            }
                        },
                        cmd = commands.recv() => break cmd,
                    }
                }
            };

            let result = match command {
                Some(TopicCommand::Follow(topic)) => {
                    if !self.topics.insert(topic) {
                        continue;
                    }
                    pubsub.subscribe(topic.name()).await
                }
                Some(TopicCommand::Unfollow(topic)) => {
                    if !self.topics.remove(&topic) {
                        continue;
                    }
                    pubsub.unsubscribe(topic.name()).await
                }
                Some(TopicCommand::Shutdown) | None => return SessionEnd::Shutdown,
            };

            if let Err(e) = result {
                // The topic set is already updated; the reconnect applies it
                tracing::error!(error = %e, "Topic change failed");
                return SessionEnd::Lost;
            }
        }
    }

    fn deliver(&self, msg: &redis::Msg) {
        let topic = msg.get_channel_name();
        let payload: String = match msg.get_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(topic, error = %e, "Dropping non-text Pub/Sub payload");
                return;
            }
        };

        let Some(received) = ReceivedMessage::from_redis(topic, payload) else {
            tracing::debug!(topic, "Ignoring message on unknown topic");
            return;
        };

        self.stats.received.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(topic, "Received Pub/Sub message");

        // No receivers is not an error
        let _ = self.events_tx.send(received);
    }
}
