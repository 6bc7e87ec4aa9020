//! Control frames sent to WebSocket clients
//!
//! Event pushes use the plain event wire form; only errors get an envelope.

use serde::{Deserialize, Serialize};

/// Error reply, sent only to the client that caused it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub code: String,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            msg_type: "error".to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Frame could not be parsed or failed validation
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::new("invalid_event", message)
    }
}
