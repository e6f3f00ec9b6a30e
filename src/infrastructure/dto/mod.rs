//! Data transfer objects for the wire protocol.

pub mod websocket;

pub use websocket::{ClientFrame, ServerFrame};
