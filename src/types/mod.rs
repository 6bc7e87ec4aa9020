//! Data types for the event pulse server
//!
//! This module contains the core data structures shared by the store, the
//! subscriber registry and the analytics pass.

mod analytics;
mod event;
mod filter;

pub use analytics::{AnalyticsReport, HourlyCount};
pub use event::{CreateEventRequest, Event, EventProperties, EventType};
pub use filter::EventFilter;

/// Result type used at the binary boundary
pub type ServerResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
