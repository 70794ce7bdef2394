//! Redis listener glue
//!
//! Two tasks run for the life of the process: one relays every received
//! pub/sub message into the [`EventRouter`], the other follows and unfollows
//! `channel:{id}` topics as the hub gains and loses local subscribers.

use super::EventRouter;
use crate::hub::TopicChange;
use realm_cache::{PubSubChannel, ReceivedMessage, Subscriber, SubscriberConfig, SubscriberError};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct EventDispatcher {
    subscriber: Arc<Subscriber>,
    relay: JoinHandle<()>,
    follower: JoinHandle<()>,
}

impl EventDispatcher {
    /// Connect the listener and spawn both tasks. The broadcast topic is
    /// followed from the start since control-plane events matter even with
    /// no active channel.
    pub fn start(
        config: SubscriberConfig,
        router: EventRouter,
        topic_changes: mpsc::UnboundedReceiver<TopicChange>,
    ) -> Result<Self, SubscriberError> {
        let subscriber = Arc::new(Subscriber::spawn(config, &[PubSubChannel::broadcast()])?);

        let relay = tokio::spawn(relay(subscriber.receiver(), router));
        let follower = tokio::spawn(follow_topics(Arc::clone(&subscriber), topic_changes));
        tracing::info!("Event dispatcher started");

        Ok(Self {
            subscriber,
            relay,
            follower,
        })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.relay.is_finished()
    }
}

async fn relay(mut messages: broadcast::Receiver<ReceivedMessage>, router: EventRouter) {
    loop {
        match messages.recv().await {
            Ok(message) => router.route(&message),
            // Dropped events are recovered by clients through `sinceId`
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event relay fell behind the listener");
            }
            Err(RecvError::Closed) => break,
        }
    }
    tracing::info!("Event relay ended");
}

async fn follow_topics(
    subscriber: Arc<Subscriber>,
    mut changes: mpsc::UnboundedReceiver<TopicChange>,
) {
    while let Some(change) = changes.recv().await {
        let result = match change {
            TopicChange::Activated(channel_id) => {
                subscriber.follow(PubSubChannel::channel(channel_id))
            }
            TopicChange::Deactivated(channel_id) => {
                subscriber.unfollow(PubSubChannel::channel(channel_id))
            }
        };

        if let Err(e) = result {
            tracing::warn!(?change, error = %e, "Listener gone; no longer following topics");
            return;
        }
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.relay.abort();
        self.follower.abort();
        // Already stopped is fine
        let _ = self.subscriber.shutdown();
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscriber", &self.subscriber)
            .field("running", &self.is_running())
            .finish()
    }
}
