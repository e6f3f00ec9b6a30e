//! History store abstraction.
//!
//! The durable message log is an external collaborator; the domain layer
//! defines the trait and the infrastructure layer provides implementations
//! (dependency inversion, same as the repository pattern used elsewhere).

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{
    entity::Message,
    error::StoreError,
    value_object::Username,
};

/// Append-only message log with a per-user relevance query.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Durably append one message.
    async fn save(&self, message: &Message) -> Result<(), StoreError>;

    /// All messages relevant to `username`, in the order they were saved.
    ///
    /// A message qualifies if the user sent it, received it, or it is a
    /// broadcast (see [`Message::concerns`]).
    async fn query(&self, username: &Username) -> Result<Vec<Message>, StoreError>;
}
