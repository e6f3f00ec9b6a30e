//! Server state shared across connection handlers.

use std::sync::Arc;

use crate::{domain::HistoryStore, registry::SessionRegistry};

/// Shared application state
pub struct AppState {
    /// The one username-to-session mapping all handlers go through
    pub registry: Arc<SessionRegistry>,
    /// Durable message log (abstraction over the external store)
    pub history: Arc<dyn HistoryStore>,
}

impl AppState {
    /// Create the shared state.
    pub fn new(registry: Arc<SessionRegistry>, history: Arc<dyn HistoryStore>) -> Self {
        Self { registry, history }
    }
}
