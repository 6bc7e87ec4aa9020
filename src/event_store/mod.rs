//! Event Store Module
//!
//! The authoritative, concurrency-safe index of ingested events. Nothing
//! else touches the underlying map; handlers and the analytics pass go
//! through [`EventStore`]'s operations only.

mod store;

pub use store::{ensure_active, EventStore, StoreError, StoreResult};
