//! Analytics over stored events
//!
//! Reports are recomputed per request from a snapshot of the store; nothing
//! is cached between requests.

mod aggregator;
mod window;

pub use aggregator::{summarize_events, AnalyticsAggregator};
pub use window::{TimeWindow, WindowError};
