//! Bounded per-connection outbound queue
//!
//! Producers never wait: when the queue is full the oldest frame is dropped
//! so that one slow socket cannot stall delivery to anyone else.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::protocol::GatewayMessage;

/// Default number of frames buffered per connection
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Outcome of a push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// The frame was queued after evicting the oldest one
    DroppedOldest,
    /// The connection is gone; the frame was discarded
    Closed,
}

#[derive(Debug, Default)]
struct QueueInner {
    frames: VecDeque<GatewayMessage>,
    closed: bool,
}

/// Outbound frames waiting for the socket writer
#[derive(Debug)]
pub struct OutboundQueue {
    inner: Mutex<QueueInner>,
    notify: Notify,
    capacity: usize,
    dropped: AtomicU64,
}

impl OutboundQueue {
    /// Create a queue; a capacity of zero is raised to one
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(QueueInner {
                frames: VecDeque::with_capacity(capacity.min(DEFAULT_QUEUE_CAPACITY)),
                closed: false,
            }),
            notify: Notify::new(),
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    /// Enqueue a frame without blocking
    pub fn push(&self, message: GatewayMessage) -> PushOutcome {
        let outcome = {
            let mut inner = self.inner.lock();
            if inner.closed {
                return PushOutcome::Closed;
            }

            let outcome = if inner.frames.len() >= self.capacity {
                inner.frames.pop_front();
                self.dropped.fetch_add(1, Ordering::Relaxed);
                PushOutcome::DroppedOldest
            } else {
                PushOutcome::Queued
            };
            inner.frames.push_back(message);
            outcome
        };

        self.notify.notify_one();
        outcome
    }

    /// Wait for the next frame; `None` once the queue is closed and drained
    pub async fn pop(&self) -> Option<GatewayMessage> {
        loop {
            let notified = self.notify.notified();
            {
                let mut inner = self.inner.lock();
                if let Some(message) = inner.frames.pop_front() {
                    return Some(message);
                }
                if inner.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Stop accepting frames and wake the writer
    pub fn close(&self) {
        self.inner.lock().closed = true;
        self.notify.notify_waiters();
        self.notify.notify_one();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Frames currently buffered
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total frames evicted by overflow since creation
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for OutboundQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn frame(n: u64) -> GatewayMessage {
        GatewayMessage::dispatch("MESSAGE_CREATE", serde_json::json!({ "n": n }))
    }

    fn n_of(message: &GatewayMessage) -> u64 {
        message.d.as_ref().and_then(|d| d["n"].as_u64()).unwrap()
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = OutboundQueue::new(8);
        for n in 0..3 {
            assert_eq!(queue.push(frame(n)), PushOutcome::Queued);
        }

        for n in 0..3 {
            assert_eq!(n_of(&queue.pop().await.unwrap()), n);
        }
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_overflow_drops_oldest() {
        let queue = OutboundQueue::new(2);
        queue.push(frame(1));
        queue.push(frame(2));
        assert_eq!(queue.push(frame(3)), PushOutcome::DroppedOldest);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dropped(), 1);
        assert_eq!(n_of(&queue.pop().await.unwrap()), 2);
        assert_eq!(n_of(&queue.pop().await.unwrap()), 3);
    }

    #[tokio::test]
    async fn test_closed_queue_rejects_and_drains() {
        let queue = OutboundQueue::new(4);
        queue.push(frame(1));
        queue.close();

        assert_eq!(queue.push(frame(2)), PushOutcome::Closed);
        assert_eq!(n_of(&queue.pop().await.unwrap()), 1);
        assert!(queue.pop().await.is_none());
    }

    #[tokio::test]
    async fn test_pop_wakes_on_push() {
        let queue = Arc::new(OutboundQueue::new(4));
        let reader = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push(frame(7));

        let received = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n_of(&received.unwrap()), 7);
    }

    #[tokio::test]
    async fn test_close_wakes_waiting_reader() {
        let queue = Arc::new(OutboundQueue::new(4));
        let reader = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();

        let received = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .unwrap()
            .unwrap();
        assert!(received.is_none());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(OutboundQueue::new(0).capacity(), 1);
    }
}
