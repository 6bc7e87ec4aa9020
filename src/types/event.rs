//! Event types
//!
//! An [`Event`] is a single recorded user action. Events are immutable once
//! stored: re-inserting an id replaces the whole value, nothing is mutated in
//! place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of user action the service accepts (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A page was viewed
    PageView,
    /// A link was clicked
    Click,
    /// A product was bought
    Purchase,
    /// A user signed up
    Signup,
}

impl EventType {
    /// All event types, in declaration order
    pub const ALL: [EventType; 4] = [
        EventType::PageView,
        EventType::Click,
        EventType::Purchase,
        EventType::Signup,
    ];

    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::Click => "click",
            EventType::Purchase => "purchase",
            EventType::Signup => "signup",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("invalid event_type '{}'", s))
    }
}

/// Type-dependent payload of an event.
///
/// Which fields are required depends on the event type; see
/// [`crate::validation::validate_properties`]. Absent fields are omitted
/// from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A stored event.
///
/// This is also the exact wire form pushed to subscribers and returned from
/// the HTTP intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "event_id")]
    pub id: String,
    pub user_id: String,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub properties: EventProperties,
}

impl Event {
    /// Create an event with empty properties
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        event_type: EventType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            event_type,
            timestamp,
            properties: EventProperties::default(),
        }
    }

    /// Builder-style setter for the payload
    pub fn with_properties(mut self, properties: EventProperties) -> Self {
        self.properties = properties;
        self
    }
}

/// Intake body for a new event.
///
/// Same shape as [`Event`] but every field is optional so that missing
/// fields are reported by validation instead of a generic parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: EventProperties,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_wire_shape() {
        let event = Event::new(
            "evt-1",
            "u1",
            EventType::PageView,
            Utc.with_ymd_and_hms(2025, 5, 26, 14, 10, 0).unwrap(),
        )
        .with_properties(EventProperties {
            page: Some("/home".to_string()),
            ..Default::default()
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_id"], "evt-1");
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["event_type"], "page_view");
        assert_eq!(json["timestamp"], "2025-05-26T14:10:00Z");
        assert_eq!(json["properties"]["page"], "/home");
        assert!(json["properties"].get("amount").is_none());
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let json = r#"{"event_id":"e","user_id":"u","event_type":"scroll","timestamp":"2025-05-26T14:10:00Z"}"#;
        assert!(serde_json::from_str::<Event>(json).is_err());
        assert!("scroll".parse::<EventType>().is_err());
        assert_eq!("signup".parse::<EventType>().unwrap(), EventType::Signup);
    }

    #[test]
    fn test_create_request_tolerates_missing_fields() {
        let req: CreateEventRequest = serde_json::from_str(r#"{"user_id":"u1"}"#).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert!(req.event_id.is_none());
        assert!(req.timestamp.is_none());
    }
}
