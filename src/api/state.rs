//! Shared application state for HTTP and WebSocket handlers

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::event_store::EventStore;
use crate::service::EventService;
use crate::subscribers::SubscriberRegistry;

/// State handed to every axum handler
pub struct AppState {
    pub service: EventService,

    /// Cancelled on shutdown; requests check it and every WebSocket
    /// connection holds a child of it
    pub shutdown: CancellationToken,

    /// Per-subscriber queue capacity
    pub subscriber_queue: usize,
}

impl AppState {
    /// Create state over fresh, empty core components
    pub fn new(config: &ServerConfig, shutdown: CancellationToken) -> Self {
        let service = EventService::new(
            Arc::new(EventStore::new()),
            Arc::new(SubscriberRegistry::new()),
        );
        Self::with_service(service, config.subscriber_queue, shutdown)
    }

    pub fn with_service(
        service: EventService,
        subscriber_queue: usize,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            service,
            shutdown,
            subscriber_queue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_uses_configured_queue() {
        let config = ServerConfig {
            subscriber_queue: 7,
            ..Default::default()
        };
        let state = AppState::new(&config, CancellationToken::new());

        assert_eq!(state.subscriber_queue, 7);
        assert!(state.service.store().is_empty());
        assert!(state.service.subscribers().is_empty());
    }
}
