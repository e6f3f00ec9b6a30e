//! Domain layer for the chat relay.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod store;
pub mod value_object;

pub use entity::Message;
pub use error::{StoreError, ValueObjectError};
pub use store::HistoryStore;
pub use value_object::{MessageContent, Username};

#[cfg(test)]
pub use store::MockHistoryStore;
