//! Presence fan-out: join/leave/online-list notifications.
//!
//! All fan-out iterates a registry snapshot taken with the lock briefly
//! held, so sends never happen under the registry lock. Delivery is
//! best-effort: a failed send to one recipient is logged and does not
//! affect delivery to the rest. Presence events are never persisted.

use std::sync::Arc;

use crate::{infrastructure::dto::ServerFrame, registry::SessionRegistry};

/// Computes and fans out presence events from registry snapshots.
pub struct PresenceBroadcaster {
    registry: Arc<SessionRegistry>,
}

impl PresenceBroadcaster {
    /// Create a broadcaster over the given registry.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Send the full online roster to every connected session.
    ///
    /// Roster and recipient set come from one snapshot, so every recipient
    /// sees the list it is part of.
    pub async fn broadcast_online_list(&self) {
        let snapshot = self.registry.snapshot().await;
        let users: Vec<String> = snapshot.iter().map(|(name, _)| name.clone()).collect();
        let frame = ServerFrame::OnlineUsers { users }.to_json();
        for (username, session) in snapshot {
            if session.tx.send(frame.clone()).is_err() {
                tracing::warn!("Failed to send online list to '{}'", username);
            }
        }
    }

    /// Announce a new login to every session except the joining user's own.
    pub async fn broadcast_join(&self, joined: &str) {
        let frame = ServerFrame::UserJoin {
            username: joined.to_string(),
        }
        .to_json();
        for (username, session) in self.registry.snapshot().await {
            if username == joined {
                continue;
            }
            if session.tx.send(frame.clone()).is_err() {
                tracing::warn!("Failed to send user_join to '{}'", username);
            }
        }
    }

    /// Announce a confirmed disconnect to every remaining session.
    ///
    /// The leaving user is already deregistered, so the snapshot contains
    /// only the recipients.
    pub async fn broadcast_leave(&self, left: &str) {
        let frame = ServerFrame::UserLeave {
            username: left.to_string(),
        }
        .to_json();
        for (username, session) in self.registry.snapshot().await {
            if session.tx.send(frame.clone()).is_err() {
                tracing::warn!("Failed to send user_leave to '{}'", username);
            }
        }
    }
}
