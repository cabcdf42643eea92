//! WebSocket handler binding one connection to one room member.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws/{room_id}?username=<name>`; the upgrade
//!    request's `x-request-id` tags every log line of the session
//! 2. Server joins the room; a full room gets an `error` frame and a close
//!    with code 4001
//! 3. Server spawns a send task draining the member's transport into the socket
//! 4. The receive loop forwards choices to the room
//! 5. On disconnect the member is removed and the survivors are notified
//!
//! # Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8000/ws/lobby?username=alice');
//!
//! ws.onmessage = (event) => {
//!   const data = JSON.parse(event.data);
//!   if (data.type === 'round_result') {
//!     showResult(data.winner, data.choices);
//!   }
//! };
//!
//! ws.send(JSON.stringify({ type: 'choice', choice: 'rock' }));
//! ```

use axum::{
    extract::{
        Path, Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use roshambo::{
    ClientMessage, RegistryError, ServerMessage,
    game::Transport,
    registry::JoinedRoom,
};
use serde::Deserialize;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::{AppState, request_id::RequestId, session::SessionState};
use crate::{logging, metrics};

/// Close code sent to a client turned away from a full room
pub const ROOM_FULL_CLOSE_CODE: u16 = 4001;

/// Close code for joins that failed for any other reason
const INTERNAL_ERROR_CLOSE_CODE: u16 = 1011;

/// Reply to anything that isn't a well-formed client message
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid message format";

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    username: Option<String>,
}

/// Upgrade HTTP connection to WebSocket for a room.
///
/// # Path Parameters
///
/// - `room_id`: Room to join; created on first join
///
/// # Query Parameters
///
/// - `username`: Optional display name. Missing or blank names get a
///   generated guest name, and names already taken get a numeric suffix.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
    request_id: RequestId,
) -> Response {
    ws.on_upgrade(move |socket| {
        handle_socket(socket, room_id, query.username, state, request_id)
    })
}

/// Handle an established WebSocket connection.
async fn handle_socket(
    socket: WebSocket,
    room_id: String,
    requested_name: Option<String>,
    state: AppState,
    request_id: RequestId,
) {
    let (mut sender, receiver) = socket.split();

    metrics::websocket_connections_total();
    metrics::websocket_connections_active(state.connection_opened());

    let (transport, outbound) = state.registry.transport();
    let unicast = transport.clone();

    let joined = match state
        .registry
        .add_player(&room_id, requested_name.as_deref(), transport)
        .await
    {
        Ok(joined) => joined,
        Err(e) => {
            reject(
                &mut sender,
                &request_id,
                &room_id,
                requested_name.as_deref(),
                &e,
            )
            .await;
            metrics::websocket_connections_active(state.connection_closed());
            return;
        }
    };

    logging::log_room_event(
        "joined",
        request_id.as_str(),
        &room_id,
        Some(&joined.username),
        &format!("Player joined ({} in room)", joined.player_count),
    );
    metrics::active_rooms(state.registry.room_count().await);

    let send_task = tokio::spawn(forward_outbound(
        sender,
        outbound,
        request_id.clone(),
        joined.clone(),
    ));

    receive_loop(receiver, &unicast, &joined, &request_id, &state).await;

    // No frames reach this connection once it starts leaving.
    send_task.abort();

    match state.registry.remove_player(&room_id, joined.player_id).await {
        Ok(true) => logging::log_room_event(
            "deleted",
            request_id.as_str(),
            &room_id,
            Some(&joined.username),
            "Last player left; room deleted",
        ),
        Ok(false) => logging::log_room_event(
            "left",
            request_id.as_str(),
            &room_id,
            Some(&joined.username),
            "Player left",
        ),
        Err(e) => tracing::warn!(
            request_id = %request_id,
            room_id = %room_id,
            username = %joined.username,
            "Failed to remove player on disconnect: {}",
            e
        ),
    }

    metrics::active_rooms(state.registry.room_count().await);
    metrics::websocket_connections_active(state.connection_closed());
}

/// Tell a client why it couldn't join, then close the socket.
async fn reject(
    sender: &mut SplitSink<WebSocket, Message>,
    request_id: &RequestId,
    room_id: &str,
    requested_name: Option<&str>,
    error: &RegistryError,
) {
    let (code, reason) = match error {
        RegistryError::RoomFull(_) => {
            logging::log_rejected_join(request_id.as_str(), room_id, requested_name);
            metrics::rejected_joins_total();
            (ROOM_FULL_CLOSE_CODE, "room full")
        }
        e => {
            tracing::error!(request_id = %request_id, room_id = %room_id, "Join failed: {}", e);
            (INTERNAL_ERROR_CLOSE_CODE, "join failed")
        }
    };

    if let Ok(json) = ServerMessage::error(error.client_message()).to_json() {
        let _ = sender.send(Message::Text(json.into())).await;
    }

    let _ = sender
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await;
}

/// Drain a member's transport into the socket until either side closes.
async fn forward_outbound(
    mut sender: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<ServerMessage>,
    request_id: RequestId,
    joined: JoinedRoom,
) {
    let mut session = SessionState::default();

    while let Some(message) = outbound.recv().await {
        let json = match message.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize {} message: {}", message.kind(), e);
                continue;
            }
        };

        if sender.send(Message::Text(json.into())).await.is_err() {
            break;
        }
        metrics::websocket_messages_sent();

        let next = session.advance(&message);
        if next != session {
            logging::log_session_transition(
                request_id.as_str(),
                &joined.room_id,
                &joined.username,
                session.as_str(),
                next.as_str(),
            );
            session = next;
        }
    }

    let closed = session.close();
    logging::log_session_transition(
        request_id.as_str(),
        &joined.room_id,
        &joined.username,
        session.as_str(),
        closed.as_str(),
    );
}

/// Process client frames until the connection closes.
async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    unicast: &Transport,
    joined: &JoinedRoom,
    request_id: &RequestId,
    state: &AppState,
) {
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                metrics::websocket_messages_received();
                tracing::debug!(
                    room_id = %joined.room_id,
                    username = %joined.username,
                    "Received message: {}",
                    text.as_str()
                );

                match ClientMessage::from_json(&text) {
                    Ok(ClientMessage::Choice { choice }) => {
                        handle_choice(&choice, unicast, joined, request_id, state).await;
                    }
                    Err(e) => {
                        tracing::warn!(
                            room_id = %joined.room_id,
                            username = %joined.username,
                            "Failed to parse client message: {}",
                            e
                        );
                        metrics::websocket_messages_rejected("invalid_format");
                        send_unicast(unicast, ServerMessage::error(INVALID_FORMAT_MESSAGE));
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                metrics::websocket_messages_received();
                metrics::websocket_messages_rejected("binary_frame");
                send_unicast(unicast, ServerMessage::error(INVALID_FORMAT_MESSAGE));
            }
            Ok(Message::Close(_)) => {
                tracing::info!(
                    request_id = %request_id,
                    room_id = %joined.room_id,
                    username = %joined.username,
                    "WebSocket closed"
                );
                break;
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    room_id = %joined.room_id,
                    username = %joined.username,
                    "WebSocket error: {}",
                    e
                );
                break;
            }
            _ => {}
        }
    }
}

async fn handle_choice(
    choice: &str,
    unicast: &Transport,
    joined: &JoinedRoom,
    request_id: &RequestId,
    state: &AppState,
) {
    match state
        .registry
        .submit_choice(&joined.room_id, joined.player_id, choice)
        .await
    {
        Ok(Some(outcome)) => {
            metrics::round_resolved(outcome.winner().is_some());
            logging::log_room_event(
                "round",
                request_id.as_str(),
                &joined.room_id,
                None,
                "Round resolved",
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                room_id = %joined.room_id,
                username = %joined.username,
                "Choice rejected: {}",
                e
            );
            metrics::websocket_messages_rejected("invalid_choice");
            send_unicast(unicast, ServerMessage::error(e.client_message()));
        }
    }
}

/// Queue a message for this connection only.
fn send_unicast(unicast: &Transport, message: ServerMessage) {
    match unicast.try_send(message) {
        Ok(()) => {}
        Err(TrySendError::Full(message)) => {
            tracing::warn!("Outbound buffer full; dropped {} message", message.kind());
        }
        Err(TrySendError::Closed(_)) => {}
    }
}
