//! Type definitions for the bridge
//!
//! Wire-level messages exchanged with the browser and the identifiers used to
//! tag a connection in the logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session identifier for WebSocket connections
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notification kinds understood by the browser UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Log,
    Error,
    Done,
    Pong,
}

/// Outbound message, sent as exactly one text frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    /// Exit status of the external process, only present on `done`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returncode: Option<i32>,
}

impl Notification {
    pub fn log(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Log,
            message: message.into(),
            returncode: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            returncode: None,
        }
    }

    pub fn done(returncode: i32) -> Self {
        Self {
            kind: NotificationKind::Done,
            message: format!("Exit code: {returncode}"),
            returncode: Some(returncode),
        }
    }

    pub fn pong() -> Self {
        Self {
            kind: NotificationKind::Pong,
            message: "pong".to_string(),
            returncode: None,
        }
    }
}

/// Request sent by the browser, keyed on its `type` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRequest {
    /// Open a video URL on the TV. The URL is already trimmed.
    Open { url: String },
    Ping,
    /// Any other `type` value; `None` when the field is missing
    Unknown { kind: Option<serde_json::Value> },
}

/// Transport-agnostic view of one inbound WebSocket frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    /// Binary and control frames; the session skips them
    Ignored,
    /// Peer closed the connection or the stream ended
    Closed,
    /// Transport-level error; the session ends without replying
    Failed(String),
}
