//! WebSocket module for streaming ingestion and real-time fan-out
//!
//! Endpoint `/ws/events`:
//! - Inbound text frames are events; they are stored and pushed to every
//!   other connected client
//! - Outbound frames are events in their wire form, or an error envelope
//!   addressed to the client whose frame was rejected

pub mod handler;
pub mod messages;

pub use handler::ws_handler;
