//! API module for HTTP and WebSocket endpoints
//!
//! This module is the request-handling collaborator around the core: it
//! validates input, calls into [`crate::service::EventService`] and maps
//! errors to HTTP responses.

pub mod http;
pub mod rest;
pub mod state;
pub mod websocket;

pub use http::create_router;
pub use state::AppState;
