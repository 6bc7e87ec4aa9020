//! Utility functions and helpers

pub mod time;

pub use time::{now, truncate_to_hour};
