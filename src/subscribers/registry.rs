//! Subscriber registry and fan-out
//!
//! `broadcast` serializes once and enqueues the payload to every subscriber
//! under the shared lock. Enqueueing never waits, so a slow consumer only
//! ever costs itself: a full queue counts as a failed delivery. Failed
//! subscribers are collected during the pass and evicted after the lock is
//! released.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use super::subscriber::{DeliveryFailure, Payload, Subscriber, SubscriberId};

/// Outcome of one broadcast, for logging and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers that accepted the payload
    pub delivered: usize,
    /// Subscribers removed because delivery failed
    pub evicted: Vec<SubscriberId>,
}

/// Thread-safe set of live subscribers
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber.
    ///
    /// Adding an id that is already present is a no-op. A handle that has
    /// been closed is refused; the connection must register a fresh one.
    /// Returns whether the subscriber is newly registered.
    pub fn add(&self, subscriber: Subscriber) -> bool {
        if subscriber.is_closed() {
            tracing::debug!(subscriber = %subscriber.id(), "refusing closed subscriber");
            return false;
        }

        let id = subscriber.id();
        let mut subscribers = self.subscribers.write();
        if subscribers.contains_key(&id) {
            return false;
        }
        subscribers.insert(id, subscriber);
        tracing::info!(subscriber = %id, total = subscribers.len(), "subscriber registered");
        true
    }

    /// Deregister and tear down a subscriber. Idempotent.
    pub fn remove(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().remove(&id);
        match removed {
            Some(subscriber) => {
                subscriber.close();
                tracing::info!(subscriber = %id, "subscriber removed");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }

    /// Deliver `message` to every registered subscriber
    pub fn broadcast<T: Serialize + ?Sized>(&self, message: &T) -> BroadcastReport {
        self.broadcast_excluding(message, None)
    }

    /// Deliver `message` to every registered subscriber except `origin`.
    ///
    /// Serialization failure aborts the whole broadcast. Delivery failures
    /// never reach the caller; they only evict the failing subscriber.
    pub fn broadcast_excluding<T: Serialize + ?Sized>(
        &self,
        message: &T,
        origin: Option<SubscriberId>,
    ) -> BroadcastReport {
        let payload: Payload = match serde_json::to_string(message) {
            Ok(json) => Arc::from(json),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize broadcast payload");
                return BroadcastReport::default();
            }
        };

        let mut delivered = 0;
        let mut failed: Vec<(SubscriberId, DeliveryFailure)> = Vec::new();
        {
            let subscribers = self.subscribers.read();
            for (id, subscriber) in subscribers.iter() {
                if Some(*id) == origin {
                    continue;
                }
                match subscriber.deliver(&payload) {
                    Ok(()) => delivered += 1,
                    Err(failure) => failed.push((*id, failure)),
                }
            }
        }

        let evicted = self.evict(failed);
        tracing::debug!(delivered, evicted = evicted.len(), "broadcast complete");
        BroadcastReport { delivered, evicted }
    }

    /// Remove subscribers whose delivery failed. Must run without holding
    /// the registry lock.
    fn evict(&self, failed: Vec<(SubscriberId, DeliveryFailure)>) -> Vec<SubscriberId> {
        failed
            .into_iter()
            .map(|(id, failure)| {
                tracing::warn!(
                    subscriber = %id,
                    error = %failure,
                    "delivery failed, evicting subscriber"
                );
                self.remove(id);
                id
            })
            .collect()
    }
}
