//! Channel wire format
//!
//! Inbound: `{"message": "<text>"}`. Outbound: `{"response": "<text>"}` on
//! success, `{"error": "<text>"}` otherwise. Parsing is pure so it can be
//! tested without a socket.

use crate::error::{ConciergeError, INVALID_JSON_FRAME, NO_MESSAGE_PROVIDED};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated inbound chat frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    pub message: String,
}

/// Frame sent back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundFrame {
    Response { response: String },
    Error { error: String },
}

impl OutboundFrame {
    pub fn response(text: impl Into<String>) -> Self {
        OutboundFrame::Response {
            response: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        OutboundFrame::Error { error: text.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OutboundFrame::Error { .. })
    }

    /// Serialize to the JSON text sent over the socket
    pub fn to_json(&self) -> String {
        // Both variants are a single string field, which cannot fail to serialize
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"Internal error"}"#.to_string())
    }
}

/// Parse an inbound payload (pure function)
///
/// Any JSON value without a string `message` field is rejected the same way,
/// including non-object values.
pub fn parse_inbound(payload: &[u8]) -> Result<InboundFrame, ConciergeError> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|_| ConciergeError::invalid_frame(INVALID_JSON_FRAME))?;

    match value.get("message").and_then(Value::as_str) {
        Some(message) => Ok(InboundFrame {
            message: message.to_string(),
        }),
        None => Err(ConciergeError::invalid_frame(NO_MESSAGE_PROVIDED)),
    }
}
