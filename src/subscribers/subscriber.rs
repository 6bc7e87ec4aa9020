//! Subscriber handles
//!
//! A connection is split in two halves: the [`Subscriber`] the registry
//! keeps for fan-out, and the [`SubscriberStream`] the connection task
//! drains. Each pair shares a bounded FIFO queue and a cancellation token.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Serialized message shared by every recipient of one broadcast
pub type Payload = Arc<str>;

/// Identity of one connection. Minted fresh per registration, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a payload could not be handed to a subscriber
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    #[error("subscriber queue is full")]
    QueueFull,
    #[error("subscriber connection is closed")]
    Closed,
}

/// Registry-side half of a subscriber
#[derive(Debug, Clone)]
pub struct Subscriber {
    id: SubscriberId,
    tx: mpsc::Sender<Payload>,
    cancel: CancellationToken,
}

/// Connection-side half of a subscriber
#[derive(Debug)]
pub struct SubscriberStream {
    id: SubscriberId,
    rx: mpsc::Receiver<Payload>,
    cancel: CancellationToken,
}

impl Subscriber {
    /// Create a connected pair with a queue of `capacity` payloads.
    ///
    /// `cancel` tears the connection down when cancelled; pass a child of a
    /// shutdown token to tie the subscriber to the server's lifetime.
    pub fn channel(capacity: usize, cancel: CancellationToken) -> (Subscriber, SubscriberStream) {
        let id = SubscriberId::new();
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Subscriber {
                id,
                tx,
                cancel: cancel.clone(),
            },
            SubscriberStream { id, rx, cancel },
        )
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Enqueue a payload without waiting
    pub fn deliver(&self, payload: &Payload) -> Result<(), DeliveryFailure> {
        if self.cancel.is_cancelled() {
            return Err(DeliveryFailure::Closed);
        }
        self.tx.try_send(Arc::clone(payload)).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryFailure::QueueFull,
            TrySendError::Closed(_) => DeliveryFailure::Closed,
        })
    }

    /// Tear the connection down. The drain task observes the token and exits.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// True once torn down or once the connection side went away
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }
}

impl SubscriberStream {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next queued payload, or `None` once the subscriber was torn down
    /// or every sender is gone.
    ///
    /// Teardown wins over queued payloads: a closed subscriber stops
    /// receiving immediately.
    pub async fn recv(&mut self) -> Option<Payload> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            payload = self.rx.recv() => payload,
        }
    }
}
