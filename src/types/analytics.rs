//! Analytics report types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::EventType;

/// Number of events that fell into one hour bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyCount {
    /// Start of the hour
    pub hour: DateTime<Utc>,
    pub count: usize,
}

/// Summary statistics over a snapshot of stored events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Window label supplied by the caller, echoed back unchanged
    pub time_window: String,
    pub total_events: usize,
    /// Only types present in the snapshot appear here
    pub events_by_type: BTreeMap<EventType, usize>,
    pub unique_users: usize,
    /// Ascending by hour
    pub events_per_hour: Vec<HourlyCount>,
}

impl AnalyticsReport {
    /// Empty report for a window
    pub fn empty(time_window: impl Into<String>) -> Self {
        Self {
            time_window: time_window.into(),
            ..Default::default()
        }
    }
}
