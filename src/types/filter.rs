//! Event filter predicate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::{Event, EventType};

/// Optional predicate over events.
///
/// Every present field must match. The time range is inclusive on both ends.
/// A filter with no fields set matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(default, rename = "start_timestamp", skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, rename = "end_timestamp", skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl EventFilter {
    /// Filter that matches every event
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn for_type(event_type: EventType) -> Self {
        Self {
            event_type: Some(event_type),
            ..Default::default()
        }
    }

    /// Inclusive `[start, end]` range
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.event_type.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }

    /// Check whether an event satisfies every present field
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ref user_id) = self.user_id {
            if *user_id != event.user_id {
                return false;
            }
        }
        if let Some(event_type) = self.event_type {
            if event_type != event.event_type {
                return false;
            }
        }
        if let Some(start) = self.start {
            if event.timestamp < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if event.timestamp > end {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 26, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let event = Event::new("e1", "u1", EventType::Click, at(10, 0));
        assert!(EventFilter::all().is_empty());
        assert!(EventFilter::all().matches(&event));
    }

    #[test]
    fn test_range_is_inclusive() {
        let filter = EventFilter::between(at(10, 0), at(11, 0));
        assert!(filter.matches(&Event::new("a", "u", EventType::Click, at(10, 0))));
        assert!(filter.matches(&Event::new("b", "u", EventType::Click, at(11, 0))));
        assert!(!filter.matches(&Event::new("c", "u", EventType::Click, at(11, 1))));
        assert!(!filter.matches(&Event::new("d", "u", EventType::Click, at(9, 59))));
    }

    #[test]
    fn test_fields_combine() {
        let filter = EventFilter {
            user_id: Some("u1".to_string()),
            event_type: Some(EventType::Purchase),
            ..Default::default()
        };
        assert!(filter.matches(&Event::new("a", "u1", EventType::Purchase, at(1, 0))));
        assert!(!filter.matches(&Event::new("b", "u1", EventType::Click, at(1, 0))));
        assert!(!filter.matches(&Event::new("c", "u2", EventType::Purchase, at(1, 0))));
    }
}
