//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{analytics, events};
use super::state::AppState;
use super::websocket::ws_handler;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint
        .route("/ws/events", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // REST API endpoints
        .route(
            "/events",
            post(events::create_event)
                .get(events::list_events)
                .delete(events::clear_events),
        )
        .route(
            "/events/:id",
            get(events::get_event).delete(events::delete_event),
        )
        .route("/analytics", get(analytics::get_analytics))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::types::{Event, EventType};
    use axum::body::{to_bytes, Body};
    use chrono::Utc;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;
    use tower::util::ServiceExt;

    fn app() -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(&ServerConfig::default(), CancellationToken::new()));
        (create_router(state.clone()), state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_event(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/events")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_create_event() {
        let (app, state) = app();
        let body = r#"{"event_id":"e1","user_id":"u1","event_type":"purchase","properties":{"amount":29.99,"product_id":"sku-1"}}"#;

        let response = app.oneshot(post_event(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["event_id"], "e1");
        assert_eq!(json["event_type"], "purchase");
        assert!(json["timestamp"].is_string());
        assert_eq!(state.service.store().len(), 1);
    }

    #[tokio::test]
    async fn test_create_event_validation_error() {
        let (app, state) = app();
        let body = r#"{"event_id":"e1","user_id":"u1","event_type":"click","properties":{}}"#;

        let response = app.oneshot(post_event(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(state.service.store().is_empty());
    }

    #[tokio::test]
    async fn test_create_event_malformed_json() {
        let (app, _) = app();
        let response = app.oneshot(post_event("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_event() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::builder().uri("/events/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_analytics_requires_window() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/analytics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(Request::builder().uri("/analytics?window=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analytics_accepts_fractional_window() {
        let (app, state) = app();
        state
            .service
            .ingest(Event::new("e1", "u1", EventType::Signup, Utc::now()), None);

        let response = app
            .oneshot(Request::builder().uri("/analytics?window=1.5h").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["time_window"], "1.5h");
        assert_eq!(json["total_events"], 1);
    }

    #[tokio::test]
    async fn test_list_large_store() {
        let (app, state) = app();
        let start = Utc::now();
        for i in 0..1500 {
            let user = if i % 3 == 0 { "u1" } else { "u2" };
            let ts = start + chrono::Duration::seconds(i);
            state
                .service
                .ingest(Event::new(format!("e{}", i), user, EventType::Signup, ts), None);
        }

        let response = app
            .oneshot(Request::builder().uri("/events?user_id=u1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["total"], 500);
        assert_eq!(json["data"][0]["event_id"], "e0");
    }

    #[tokio::test]
    async fn test_requests_fail_during_shutdown() {
        let (app, state) = app();
        state.shutdown.cancel();

        let response = app
            .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
