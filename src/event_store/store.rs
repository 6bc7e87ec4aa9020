//! Event Store - concurrent in-memory event index
//!
//! Writers (`insert`, `delete`, `clear`) take the lock exclusively, readers
//! (`get`, `scan`) share it. Events are held behind `Arc` and swapped whole,
//! so a reader can never see a half-written event.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::types::{Event, EventFilter};

/// Stores at or above this size are scanned with rayon
const PARALLEL_SCAN_THRESHOLD: usize = 1000;

/// Result type for EventStore operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("event '{0}' not found")]
    NotFound(String),
    #[error("operation cancelled")]
    Cancelled,
}

/// Fail fast with [`StoreError::Cancelled`] if the caller gave up
pub fn ensure_active(cancel: &CancellationToken) -> StoreResult<()> {
    if cancel.is_cancelled() {
        Err(StoreError::Cancelled)
    } else {
        Ok(())
    }
}

/// Thread-safe keyed collection of events
#[derive(Debug, Default)]
pub struct EventStore {
    events: RwLock<HashMap<String, Arc<Event>>>,
}

impl EventStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an event keyed by its id.
    ///
    /// Last write wins: an existing event with the same id is replaced and
    /// handed back to the caller. This never fails.
    pub fn insert(&self, event: impl Into<Arc<Event>>) -> Option<Arc<Event>> {
        let event: Arc<Event> = event.into();
        self.events.write().insert(event.id.clone(), event)
    }

    /// Point lookup
    pub fn get(&self, id: &str) -> StoreResult<Arc<Event>> {
        self.events
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Snapshot of every event matching `filter`.
    ///
    /// Order is unspecified; callers that need an order must sort.
    pub fn scan(&self, filter: &EventFilter) -> Vec<Arc<Event>> {
        let events = self.events.read();

        if events.len() >= PARALLEL_SCAN_THRESHOLD {
            events
                .par_iter()
                .filter(|(_, e)| filter.matches(e))
                .map(|(_, e)| Arc::clone(e))
                .collect()
        } else {
            events
                .values()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect()
        }
    }

    /// Remove an event. Idempotent: removing an absent id is not an error.
    pub fn delete(&self, id: &str) -> Option<Arc<Event>> {
        self.events.write().remove(id)
    }

    /// Remove every event, returning how many were dropped
    pub fn clear(&self) -> usize {
        let mut events = self.events.write();
        let removed = events.len();
        events.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}
