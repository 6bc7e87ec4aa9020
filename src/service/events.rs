//! Event service: the single entry point handlers use
//!
//! Ingest is `validate → insert → broadcast`. Reads check the caller's
//! cancellation token before touching the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::analytics::{AnalyticsAggregator, TimeWindow};
use crate::event_store::{ensure_active, EventStore, StoreResult};
use crate::subscribers::{BroadcastReport, SubscriberId, SubscriberRegistry};
use crate::types::{AnalyticsReport, Event, EventFilter};

/// Result of ingesting one event
#[derive(Debug, Clone)]
pub struct Ingested {
    pub event: Arc<Event>,
    /// The event this one overwrote, if the id was already stored
    pub replaced: Option<Arc<Event>>,
    pub broadcast: BroadcastReport,
}

/// Composes the store, the subscriber registry and the aggregator
#[derive(Debug, Clone)]
pub struct EventService {
    store: Arc<EventStore>,
    subscribers: Arc<SubscriberRegistry>,
    analytics: AnalyticsAggregator,
}

impl EventService {
    pub fn new(store: Arc<EventStore>, subscribers: Arc<SubscriberRegistry>) -> Self {
        let analytics = AnalyticsAggregator::new(Arc::clone(&store));
        Self {
            store,
            subscribers,
            analytics,
        }
    }

    pub fn store(&self) -> &Arc<EventStore> {
        &self.store
    }

    pub fn subscribers(&self) -> &Arc<SubscriberRegistry> {
        &self.subscribers
    }

    /// Store a validated event and fan it out.
    ///
    /// `origin` is the streaming connection that produced the event, if
    /// any; it is not echoed its own event.
    pub fn ingest(&self, event: Event, origin: Option<SubscriberId>) -> Ingested {
        let event = Arc::new(event);
        let replaced = self.store.insert(Arc::clone(&event));
        if let Some(ref previous) = replaced {
            tracing::debug!(event_id = %previous.id, "event id reused, previous value replaced");
        }

        let broadcast = self.subscribers.broadcast_excluding(&*event, origin);
        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            user_id = %event.user_id,
            delivered = broadcast.delivered,
            "event ingested"
        );

        Ingested {
            event,
            replaced,
            broadcast,
        }
    }

    pub fn get_event(&self, id: &str, cancel: &CancellationToken) -> StoreResult<Arc<Event>> {
        ensure_active(cancel)?;
        self.store.get(id)
    }

    /// Matching events, oldest first
    pub fn list_events(
        &self,
        filter: &EventFilter,
        cancel: &CancellationToken,
    ) -> StoreResult<Vec<Arc<Event>>> {
        ensure_active(cancel)?;
        let mut events = self.store.scan(filter);
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    pub fn analytics(
        &self,
        window: &TimeWindow,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> StoreResult<AnalyticsReport> {
        ensure_active(cancel)?;
        Ok(self.analytics.summarize_window(window, now))
    }

    pub fn delete_event(&self, id: &str) -> bool {
        let removed = self.store.delete(id).is_some();
        if removed {
            tracing::info!(event_id = %id, "event deleted");
        }
        removed
    }

    pub fn clear_events(&self) -> usize {
        let removed = self.store.clear();
        tracing::info!(removed, "event store cleared");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::StoreError;
    use crate::subscribers::Subscriber;
    use crate::types::EventType;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 26, 14, minute, 0).unwrap()
    }

    fn service() -> EventService {
        EventService::new(Arc::new(EventStore::new()), Arc::new(SubscriberRegistry::new()))
    }

    #[tokio::test]
    async fn test_ingest_stores_and_broadcasts() {
        let service = service();
        let (subscriber, mut stream) = Subscriber::channel(4, CancellationToken::new());
        service.subscribers().add(subscriber);

        let ingested = service.ingest(Event::new("e1", "u1", EventType::Click, at(0)), None);
        assert!(ingested.replaced.is_none());
        assert_eq!(ingested.broadcast.delivered, 1);

        let payload = stream.recv().await.unwrap();
        let received: Event = serde_json::from_str(&payload).unwrap();
        assert_eq!(received, *ingested.event);
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test]
    async fn test_ingest_skips_origin() {
        let service = service();
        let (origin, _origin_stream) = Subscriber::channel(4, CancellationToken::new());
        let origin_id = origin.id();
        service.subscribers().add(origin);

        let event = Event::new("e1", "u1", EventType::Click, at(0));
        let ingested = service.ingest(event, Some(origin_id));
        assert_eq!(ingested.broadcast.delivered, 0);
    }

    #[test]
    fn test_ingest_reports_replacement() {
        let service = service();
        service.ingest(Event::new("e1", "u1", EventType::Click, at(0)), None);
        let second = service.ingest(Event::new("e1", "u2", EventType::Click, at(1)), None);

        assert_eq!(second.replaced.unwrap().user_id, "u1");
        assert_eq!(service.store().len(), 1);
    }

    #[test]
    fn test_list_events_sorted_by_timestamp() {
        let service = service();
        service.ingest(Event::new("late", "u1", EventType::Click, at(30)), None);
        service.ingest(Event::new("early", "u1", EventType::Click, at(1)), None);

        let ids: Vec<String> = service
            .list_events(&EventFilter::all(), &CancellationToken::new())
            .unwrap()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_cancelled_reads_fail_fast() {
        let service = service();
        service.ingest(Event::new("e1", "u1", EventType::Click, at(0)), None);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(service.get_event("e1", &cancel).unwrap_err(), StoreError::Cancelled);
        assert_eq!(
            service.list_events(&EventFilter::all(), &cancel).unwrap_err(),
            StoreError::Cancelled
        );
        let window = TimeWindow::parse("1h").unwrap();
        assert_eq!(
            service.analytics(&window, at(0), &cancel).unwrap_err(),
            StoreError::Cancelled
        );
    }

    #[test]
    fn test_delete_and_clear() {
        let service = service();
        service.ingest(Event::new("a", "u1", EventType::Click, at(0)), None);
        service.ingest(Event::new("b", "u1", EventType::Click, at(1)), None);

        assert!(service.delete_event("a"));
        assert!(!service.delete_event("a"));
        assert_eq!(service.clear_events(), 1);
    }
}
