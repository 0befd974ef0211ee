use std::sync::{Arc, RwLock};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::membership::types::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressErrorKind {
    Closed,
    QueueClosed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct IngressError {
    pub kind: IngressErrorKind,
    pub message: String,
}

fn closed() -> IngressError {
    IngressError {
        kind: IngressErrorKind::Closed,
        message: "event ingress is closed".to_string(),
    }
}

fn queue_closed() -> IngressError {
    IngressError {
        kind: IngressErrorKind::QueueClosed,
        message: "membership worker is no longer receiving events".to_string(),
    }
}

/// Sending side of the membership event channel.
///
/// Clones share one sender slot. `close` empties the slot, so later sends
/// fail with `Closed` and the worker sees the channel end once sends that
/// were already waiting for queue space have finished.
#[derive(Clone)]
pub struct EventIngress {
    tx: Arc<RwLock<Option<mpsc::Sender<Event>>>>,
}

impl EventIngress {
    /// Creates a bounded channel of `capacity` events and returns its
    /// ingress and receiver.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let ingress = Self {
            tx: Arc::new(RwLock::new(Some(tx))),
        };
        (ingress, rx)
    }

    pub fn is_open(&self) -> bool {
        self.tx.read().expect("lock poisoned").is_some()
    }

    /// Enqueues `event`, waiting while the queue is full.
    pub async fn send(&self, event: Event) -> Result<(), IngressError> {
        let tx = self.tx.read().expect("lock poisoned").clone().ok_or_else(closed)?;
        tx.send(event).await.map_err(|_| queue_closed())
    }

    pub fn close(&self) {
        if self.tx.write().expect("lock poisoned").take().is_some() {
            tracing::debug!(target: "membership", "event_ingress_closed");
        }
    }
}
