//! WebSocket chat relay server implementation.

pub mod handler;
pub mod presence;
pub mod runner;
pub mod signal;
pub mod state;

pub use presence::PresenceBroadcaster;
pub use runner::{ServerConfig, run, run_with_state};
pub use state::AppState;
