//! Summary statistics over a filtered snapshot of the store

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::event_store::EventStore;
use crate::types::{AnalyticsReport, Event, EventFilter, HourlyCount};
use crate::utils::truncate_to_hour;

use super::window::TimeWindow;

/// Computes [`AnalyticsReport`]s from the event store
#[derive(Debug, Clone)]
pub struct AnalyticsAggregator {
    store: Arc<EventStore>,
}

impl AnalyticsAggregator {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }

    /// Scan the store with `filter` and summarize the snapshot.
    ///
    /// `time_window` is echoed into the report, never derived from data.
    pub fn summarize(&self, filter: &EventFilter, time_window: &str) -> AnalyticsReport {
        let snapshot = self.store.scan(filter);
        summarize_events(&snapshot, time_window)
    }

    /// Summarize the window `[now - window, now]`
    pub fn summarize_window(&self, window: &TimeWindow, now: DateTime<Utc>) -> AnalyticsReport {
        self.summarize(&window.filter_ending_at(now), window.label())
    }
}

/// Single pass over a snapshot
pub fn summarize_events(events: &[Arc<Event>], time_window: &str) -> AnalyticsReport {
    let mut events_by_type = BTreeMap::new();
    let mut users: HashSet<&str> = HashSet::new();
    let mut per_hour: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();

    for event in events {
        *events_by_type.entry(event.event_type).or_insert(0) += 1;
        users.insert(event.user_id.as_str());
        *per_hour.entry(truncate_to_hour(event.timestamp)).or_insert(0) += 1;
    }

    AnalyticsReport {
        time_window: time_window.to_string(),
        total_events: events.len(),
        events_by_type,
        unique_users: users.len(),
        // BTreeMap iteration is already ascending by hour
        events_per_hour: per_hour
            .into_iter()
            .map(|(hour, count)| HourlyCount { hour, count })
            .collect(),
    }
}
