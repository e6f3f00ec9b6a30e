//! WebSocket frame DTOs for the relay protocol.
//!
//! Inbound and outbound frames are closed tagged enums: an unrecognized
//! `type` or a missing required field fails deserialization and the frame
//! is dropped by the handler.

use serde::{Deserialize, Serialize};

use crate::domain::Message;

/// Inbound client frames, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Claim a username for this connection
    Login { username: String },
    /// Send a broadcast (`receiver` absent or null) or private message
    Message {
        sender: String,
        content: String,
        #[serde(default)]
        receiver: Option<String>,
    },
}

/// Outbound server frames, tagged by `type`.
///
/// `receiver` is always serialized, as `null` for broadcasts, matching the
/// wire shape clients already expect for both live and replayed messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Full presence roster
    OnlineUsers { users: Vec<String> },
    /// A user's first login was announced
    UserJoin { username: String },
    /// A user's registered connection closed
    UserLeave { username: String },
    /// A chat message, live or replayed from history
    Message {
        sender: String,
        content: String,
        receiver: Option<String>,
    },
    /// A request that could not be honored (e.g. persistence failure)
    Error { message: String },
}

impl ServerFrame {
    /// Build a `message` frame from a domain message.
    pub fn from_message(message: &Message) -> Self {
        Self::Message {
            sender: message.sender.as_str().to_string(),
            content: message.content.as_str().to_string(),
            receiver: message.receiver.as_ref().map(|r| r.as_str().to_string()),
        }
    }

    /// Serialize to the JSON wire form.
    ///
    /// These variants contain only strings and string lists, so
    /// serialization cannot fail.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}
