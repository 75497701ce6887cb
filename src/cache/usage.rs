//! Best-effort side channel for cache usage counters.
//!
//! Callers enqueue events and move on; one background task applies them to
//! the store in order. Nothing on this path can fail or slow down a lookup
//! or a build: store errors are logged and dropped.

use crate::store::BlueprintStore;
use crate::types::CacheId;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
enum UsageEvent {
    Hit(CacheId),
    Build { cache_id: CacheId, success: bool },
    Flush(oneshot::Sender<()>),
}

/// Non-blocking dispatcher for `times_used` and build-outcome updates.
#[derive(Clone)]
pub struct UsageChannel {
    sender: mpsc::UnboundedSender<UsageEvent>,
}

impl UsageChannel {
    /// Starts the background drain task. Must be called inside a tokio runtime.
    pub fn spawn(store: Arc<dyn BlueprintStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(drain(store, receiver));
        Self { sender }
    }

    /// Queues a `times_used` increment.
    pub fn record_hit(&self, cache_id: CacheId) {
        self.send(UsageEvent::Hit(cache_id));
    }

    /// Queues a build outcome.
    pub fn record_build(&self, cache_id: CacheId, success: bool) {
        self.send(UsageEvent::Build { cache_id, success });
    }

    /// Waits until every event queued before this call has been applied.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        self.send(UsageEvent::Flush(ack));
        let _ = done.await;
    }

    fn send(&self, event: UsageEvent) {
        if let Err(e) = self.sender.send(event) {
            log::warn!("Usage channel closed, dropping {:?}", e.0);
        }
    }
}

async fn drain(store: Arc<dyn BlueprintStore>, mut receiver: mpsc::UnboundedReceiver<UsageEvent>) {
    while let Some(event) = receiver.recv().await {
        match event {
            UsageEvent::Hit(cache_id) => {
                if let Err(e) = store.increment_usage(&cache_id).await {
                    log::warn!("Failed to increment usage for {}: {}", cache_id, e);
                }
            }
            UsageEvent::Build { cache_id, success } => {
                if let Err(e) = store.record_build(&cache_id, success).await {
                    log::warn!(
                        "Failed to record build outcome ({}) for {}: {}",
                        if success { "success" } else { "failure" },
                        cache_id,
                        e
                    );
                }
            }
            UsageEvent::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    log::debug!("Usage channel drained");
}
