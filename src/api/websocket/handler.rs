//! WebSocket connection handler
//!
//! Each connection is one subscriber. Its task is the only writer to the
//! socket: it drains the subscriber queue and handles inbound frames.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};

use super::messages::ErrorMessage;
use crate::api::state::AppState;
use crate::subscribers::{Subscriber, SubscriberId};
use crate::types::CreateEventRequest;
use crate::utils::now;
use crate::validation::validate_event;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let (subscriber, mut stream) =
        Subscriber::channel(state.subscriber_queue, state.shutdown.child_token());
    let id = subscriber.id();
    let subscribers = state.service.subscribers();

    if !subscribers.add(subscriber) {
        return;
    }

    loop {
        tokio::select! {
            // Queued broadcasts for this client
            payload = stream.recv() => {
                match payload {
                    Some(payload) => {
                        if socket.send(Message::Text(payload.to_string())).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    None => {
                        // Evicted or shutting down
                        let _ = socket.send(Message::Close(None)).await;
                        break;
                    }
                }
            }

            // Frames from the client
            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket, &state, id).await {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        tracing::debug!(subscriber = %id, error = %e, "websocket read failed");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    subscribers.remove(id);
}

/// Handle a frame from the client.
/// Returns false if the connection should be closed.
async fn handle_client_message(
    msg: Message,
    socket: &mut WebSocket,
    state: &AppState,
    id: SubscriberId,
) -> bool {
    match msg {
        Message::Text(text) => {
            if let Err(reply) = ingest_frame(&text, state, id) {
                tracing::warn!(subscriber = %id, error = %reply.message, "rejected event frame");
                if let Ok(json) = serde_json::to_string(&reply) {
                    if socket.send(Message::Text(json)).await.is_err() {
                        return false;
                    }
                }
            }
            true
        }
        Message::Binary(_) => {
            tracing::warn!(subscriber = %id, "binary frames are not supported");
            true
        }
        Message::Ping(data) => socket.send(Message::Pong(data)).await.is_ok(),
        Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(subscriber = %id, "client closed connection");
            false
        }
    }
}

/// Parse, validate and ingest one text frame
fn ingest_frame(text: &str, state: &AppState, id: SubscriberId) -> Result<(), ErrorMessage> {
    let request: CreateEventRequest = serde_json::from_str(text)
        .map_err(|e| ErrorMessage::invalid_event(format!("malformed event: {}", e)))?;
    let event = validate_event(request, now())
        .map_err(|e| ErrorMessage::invalid_event(e.to_string()))?;

    state.service.ingest(event, Some(id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use tokio_util::sync::CancellationToken;

    fn state() -> AppState {
        AppState::new(&ServerConfig::default(), CancellationToken::new())
    }

    #[test]
    fn test_ingest_frame_stores_event() {
        let state = state();
        let frame = r#"{"event_id":"e1","user_id":"u1","event_type":"click","properties":{"link":"/x"}}"#;

        ingest_frame(frame, &state, SubscriberId::new()).unwrap();
        let stored = state.service.store().get("e1").unwrap();
        assert_eq!(stored.user_id, "u1");
    }

    #[test]
    fn test_ingest_frame_keeps_client_timestamp() {
        let state = state();
        let frame = r#"{"event_id":"e1","user_id":"u1","event_type":"signup","timestamp":"2025-05-26T14:10:00Z","properties":{"email":"a@b.c"}}"#;

        ingest_frame(frame, &state, SubscriberId::new()).unwrap();
        let stored = state.service.store().get("e1").unwrap();
        assert_eq!(stored.timestamp.to_rfc3339(), "2025-05-26T14:10:00+00:00");
    }

    #[test]
    fn test_ingest_frame_rejects_invalid() {
        let state = state();

        let err = ingest_frame("not json", &state, SubscriberId::new()).unwrap_err();
        assert_eq!(err.code, "invalid_event");

        let err = ingest_frame(
            r#"{"event_id":"e1","user_id":"u1","event_type":"page_view"}"#,
            &state,
            SubscriberId::new(),
        )
        .unwrap_err();
        assert!(err.message.contains("page"));
        assert!(state.service.store().is_empty());
    }
}
