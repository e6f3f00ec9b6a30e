//! Realtime chat relay library.
//!
//! Clients connect over WebSocket, claim a username, and exchange broadcast
//! or private messages while the server maintains a live presence roster
//! and replays relevant history on login.

pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod registry;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ServerConfig, run, run_with_state};
