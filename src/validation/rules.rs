//! Intake and query validation rules

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{CreateEventRequest, Event, EventFilter, EventProperties, EventType};

/// Reasons an intake body or query filter is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid event_type '{0}'")]
    InvalidEventType(String),
    #[error("{field} is required for {event_type} events")]
    MissingProperty {
        field: &'static str,
        event_type: EventType,
    },
    #[error("amount must be greater than 0 for purchase events")]
    NonPositiveAmount,
    #[error("start_timestamp must not be after end_timestamp")]
    FilterConflict,
}

/// Validate an intake body and turn it into an [`Event`].
///
/// A missing timestamp is filled with `fallback_timestamp`.
pub fn validate_event(
    request: CreateEventRequest,
    fallback_timestamp: DateTime<Utc>,
) -> Result<Event, ValidationError> {
    let id = required(request.event_id, "event_id")?;
    let user_id = required(request.user_id, "user_id")?;
    let raw_type = required(request.event_type, "event_type")?;
    let event_type: EventType = raw_type
        .parse()
        .map_err(|_| ValidationError::InvalidEventType(raw_type.clone()))?;

    validate_properties(event_type, &request.properties)?;

    Ok(Event {
        id,
        user_id,
        event_type,
        timestamp: request.timestamp.unwrap_or(fallback_timestamp),
        properties: request.properties,
    })
}

/// Check the payload fields required by `event_type`
pub fn validate_properties(
    event_type: EventType,
    properties: &EventProperties,
) -> Result<(), ValidationError> {
    let missing = |field| ValidationError::MissingProperty { field, event_type };

    match event_type {
        EventType::PageView => {
            if is_blank(&properties.page) {
                return Err(missing("page"));
            }
        }
        EventType::Click => {
            if is_blank(&properties.link) {
                return Err(missing("link"));
            }
        }
        EventType::Purchase => {
            match properties.amount {
                Some(amount) if amount > 0.0 => {}
                Some(_) => return Err(ValidationError::NonPositiveAmount),
                None => return Err(missing("amount")),
            }
            if is_blank(&properties.product_id) {
                return Err(missing("product_id"));
            }
        }
        EventType::Signup => {
            if is_blank(&properties.email) {
                return Err(missing("email"));
            }
        }
    }
    Ok(())
}

/// Reject filters the store must never see
pub fn validate_filter(filter: &EventFilter) -> Result<(), ValidationError> {
    if matches!(filter.user_id.as_deref(), Some("")) {
        return Err(ValidationError::MissingField("user_id"));
    }
    if let (Some(start), Some(end)) = (filter.start, filter.end) {
        if start > end {
            return Err(ValidationError::FilterConflict);
        }
    }
    Ok(())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
