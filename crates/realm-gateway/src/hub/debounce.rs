//! Trailing debounce for control-plane changes
//!
//! Bursts of channel create/update/delete events collapse into one
//! callback that fires once the burst has been quiet for the configured delay.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default quiet period before a refresh is emitted
pub const DEFAULT_CONTROL_DEBOUNCE: Duration = Duration::from_millis(300);

/// Handle used to feed signals into a running debouncer
#[derive(Debug, Clone)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    /// Spawn the debounce task. It stops once every `Debouncer` clone is dropped,
    /// flushing a pending burst first.
    pub fn spawn<F>(delay: Duration, on_fire: F) -> (Self, JoinHandle<()>)
    where
        F: Fn() + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(delay, rx, on_fire));
        (Self { tx }, task)
    }

    /// Record a change; the callback fires `delay` after the last one
    pub fn notify(&self) {
        if self.tx.send(()).is_err() {
            tracing::warn!("Debounce task has stopped");
        }
    }
}

async fn run<F>(delay: Duration, mut rx: mpsc::UnboundedReceiver<()>, on_fire: F)
where
    F: Fn(),
{
    while rx.recv().await.is_some() {
        loop {
            match tokio::time::timeout(delay, rx.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => {
                    on_fire();
                    return;
                }
                Err(_) => break,
            }
        }
        on_fire();
    }
}
