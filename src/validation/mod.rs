//! Validation for event intake and query filters
//!
//! The store trusts what it is given; every inbound event and filter passes
//! through here first.

mod rules;

pub use rules::{validate_event, validate_filter, validate_properties, ValidationError};
