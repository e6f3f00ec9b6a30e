//! Core domain models for the chat relay.

use serde::{Deserialize, Serialize};

use super::value_object::{MessageContent, Username};

/// Represents a single chat message.
///
/// A message with no receiver is a broadcast, visible to every user's
/// history query; a message with a receiver is private, visible only to
/// the sender and the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Claimed sender of the message
    pub sender: Username,
    /// Message content
    pub content: MessageContent,
    /// Designated receiver; `None` means broadcast
    pub receiver: Option<Username>,
}

impl Message {
    /// Create a new chat message
    pub fn new(sender: Username, content: MessageContent, receiver: Option<Username>) -> Self {
        Self {
            sender,
            content,
            receiver,
        }
    }

    /// Whether this message is a broadcast (no designated receiver)
    pub fn is_broadcast(&self) -> bool {
        self.receiver.is_none()
    }

    /// Whether this message belongs in `username`'s history.
    ///
    /// A message qualifies if the user sent it, received it, or it is
    /// a broadcast.
    pub fn concerns(&self, username: &Username) -> bool {
        self.sender == *username
            || self.receiver.as_ref() == Some(username)
            || self.receiver.is_none()
    }
}
