//! WebSocket connection handlers.
//!
//! One handler task per connection. Inbound frames are processed in arrival
//! order; outbound frames go through the connection's unbounded channel and
//! a dedicated send pump, so delivering to this connection never blocks
//! whoever is fanning out.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{Message, MessageContent, Username},
    infrastructure::dto::{ClientFrame, ServerFrame},
    ui::{presence::PresenceBroadcaster, state::AppState},
    usecase::{DisconnectUseCase, LoginUseCase, Routing, SendMessageUseCase},
};

use crate::registry::SessionHandle;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();

    // Channel feeding this connection's send pump
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let handle = SessionHandle::new(tx);
    let conn_id = handle.conn_id;

    tracing::info!("Connection {} accepted", conn_id);

    // Send pump: drains the channel into the socket, then closes the
    // transport. The channel closing (all senders dropped) is the signal
    // to shut down, so the close attempt runs on every exit path.
    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sink.send(WsMessage::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    // Receive loop: frames are handled in arrival order on this task.
    // `username` tracks the login state of this connection.
    let mut username: Option<Username> = None;
    while let Some(msg) = stream.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!("WebSocket error on {}: {}", conn_id, e);
                break;
            }
        };

        match msg {
            WsMessage::Text(text) => {
                handle_frame(&state, &handle, &mut username, text.as_str()).await;
            }
            WsMessage::Ping(_) => {
                // Pong is sent automatically by the protocol layer
                tracing::debug!("Received ping on {}", conn_id);
            }
            WsMessage::Close(_) => {
                tracing::info!("Connection {} requested close", conn_id);
                break;
            }
            _ => {}
        }
    }

    // Teardown: runs regardless of how the receive loop ended. Only the
    // currently registered connection may remove the entry; a stale
    // teardown after a reconnect produces no presence broadcast.
    let removed = match &username {
        Some(name) => {
            DisconnectUseCase::new(state.registry.clone())
                .execute(name.as_str(), conn_id)
                .await
        }
        None => false,
    };

    // Dropping our sender closes the pump's channel, which closes the
    // transport once any queued frames are flushed.
    drop(handle);
    let _ = send_task.await;

    if removed {
        let name = username.as_ref().map(|n| n.as_str()).unwrap_or_default();
        tracing::info!("'{}' disconnected", name);
        let presence = PresenceBroadcaster::new(state.registry.clone());
        presence.broadcast_leave(name).await;
        presence.broadcast_online_list().await;
    }
}

/// Route one inbound frame. Malformed payloads are logged and dropped;
/// the connection stays in its current state.
async fn handle_frame(
    state: &Arc<AppState>,
    handle: &SessionHandle,
    username: &mut Option<Username>,
    text: &str,
) {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Dropping malformed frame: {}", e);
            return;
        }
    };

    match frame {
        ClientFrame::Login { username: claimed } => {
            handle_login(state, handle, username, claimed).await;
        }
        ClientFrame::Message {
            sender,
            content,
            receiver,
        } => {
            handle_message(state, handle, sender, content, receiver).await;
        }
    }
}

/// Login: register the claimed username, announce presence, replay history.
async fn handle_login(
    state: &Arc<AppState>,
    handle: &SessionHandle,
    username: &mut Option<Username>,
    claimed: String,
) {
    let name = match Username::new(claimed) {
        Ok(name) => name,
        Err(e) => {
            // Connection stays unauthenticated
            tracing::warn!("Ignoring login with invalid username: {}", e);
            return;
        }
    };

    // A re-login under a different name releases the previous one: this
    // connection can only ever hold one registry entry, so the old name
    // must not linger in the roster (or keep the send pump alive) after
    // the rename.
    if let Some(previous) = username.take()
        && previous != name
    {
        let removed = DisconnectUseCase::new(state.registry.clone())
            .execute(previous.as_str(), handle.conn_id)
            .await;
        if removed {
            tracing::info!("'{}' renamed to '{}'", previous, name);
            PresenceBroadcaster::new(state.registry.clone())
                .broadcast_leave(previous.as_str())
                .await;
        }
    }

    let login = LoginUseCase::new(state.registry.clone(), state.history.clone());
    let outcome = login.execute(&name, handle.clone()).await;
    *username = Some(name.clone());
    tracing::info!(
        "'{}' logged in on {} (new login: {})",
        name,
        handle.conn_id,
        outcome.is_new_login
    );

    // A new user is announced before anyone sees the refreshed roster;
    // a reconnect skips the join announcement entirely.
    let presence = PresenceBroadcaster::new(state.registry.clone());
    if outcome.is_new_login {
        presence.broadcast_join(name.as_str()).await;
    }
    presence.broadcast_online_list().await;

    // History replay goes to this connection only, in stored order
    for message in &outcome.history {
        if handle
            .tx
            .send(ServerFrame::from_message(message).to_json())
            .is_err()
        {
            tracing::warn!("Failed to replay history to '{}'", name);
            break;
        }
    }
}

/// Chat message: validate, persist, then deliver to the recipient set.
async fn handle_message(
    state: &Arc<AppState>,
    handle: &SessionHandle,
    sender: String,
    content: String,
    receiver: Option<String>,
) {
    let sender = match Username::new(sender) {
        Ok(sender) => sender,
        Err(e) => {
            tracing::warn!("Dropping message with invalid sender: {}", e);
            return;
        }
    };
    let content = match MessageContent::new(content) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Dropping message from '{}': {}", sender, e);
            return;
        }
    };
    // An empty receiver string means broadcast, same as absent
    let receiver = match receiver.filter(|r| !r.is_empty()) {
        None => None,
        Some(raw) => match Username::new(raw) {
            Ok(receiver) => Some(receiver),
            Err(e) => {
                tracing::warn!("Dropping message from '{}': {}", sender, e);
                return;
            }
        },
    };

    let message = Message::new(sender, content, receiver);
    let usecase = SendMessageUseCase::new(state.registry.clone(), state.history.clone());

    match usecase.execute(&message).await {
        Ok(Routing::Broadcast(snapshot)) => {
            let frame = ServerFrame::from_message(&message).to_json();
            for (username, session) in snapshot {
                if session.tx.send(frame.clone()).is_err() {
                    tracing::warn!("Failed to deliver broadcast to '{}'", username);
                }
            }
        }
        Ok(Routing::Private { receiver }) => {
            let frame = ServerFrame::from_message(&message).to_json();
            if let Some(session) = receiver
                && session.tx.send(frame.clone()).is_err()
            {
                tracing::warn!(
                    "Failed to deliver private message from '{}'",
                    message.sender
                );
            }
            // Echo on the sending connection so the sender's UI shows it
            if handle.tx.send(frame).is_err() {
                tracing::warn!("Failed to echo message to '{}'", message.sender);
            }
        }
        Err(e) => {
            // Not durably recorded: abort delivery, tell the sender
            tracing::warn!("Message from '{}' not delivered: {}", message.sender, e);
            let frame = ServerFrame::Error {
                message: e.to_string(),
            }
            .to_json();
            let _ = handle.tx.send(frame);
        }
    }
}
