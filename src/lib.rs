//! Event Pulse Server
//!
//! Ingests user events over HTTP and WebSocket, keeps them in a concurrent
//! in-memory index, pushes every new event to the other connected
//! WebSocket clients, and answers aggregate queries over the stored set.
//!
//! # Modules
//!
//! - `types`: Core data structures (Event, EventFilter, AnalyticsReport)
//! - `event_store`: Concurrent keyed event index
//! - `subscribers`: Live subscriber registry and fan-out
//! - `analytics`: Summary reports over store snapshots
//! - `validation`: Intake and filter validation
//! - `service`: Ingest and query entry points used by handlers
//! - `api`: Axum router, REST and WebSocket handlers
//! - `server`: Listener and graceful shutdown
//! - `config`, `logging`: Environment configuration and tracing setup
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Utc;
//! use event_pulse::{EventFilter, EventService, EventStore, SubscriberRegistry};
//! use event_pulse::types::{Event, EventType};
//!
//! let service =
//!     EventService::new(Arc::new(EventStore::new()), Arc::new(SubscriberRegistry::new()));
//! service.ingest(Event::new("e1", "u1", EventType::Signup, Utc::now()), None);
//! assert_eq!(service.store().scan(&EventFilter::all()).len(), 1);
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod event_store;
pub mod logging;
pub mod server;
pub mod service;
pub mod subscribers;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at crate root
pub use analytics::{AnalyticsAggregator, TimeWindow};
pub use event_store::{EventStore, StoreError};
pub use service::EventService;
pub use subscribers::{Subscriber, SubscriberId, SubscriberRegistry};
pub use types::{AnalyticsReport, Event, EventFilter, EventType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
