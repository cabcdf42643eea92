//! Room actor implementation with async message handling.

use super::{
    errors::{RegistryError, RegistryResult},
    messages::{RoomMessage, RoomResponse},
};
use crate::{
    game::{Choice, Player, PlayerId, ROOM_CAPACITY, Room, RoomError, RoomId, RoomPhase},
    net::messages::ServerMessage,
};
use tokio::sync::{mpsc, oneshot};

/// Room actor handle for sending messages
#[derive(Clone, Debug)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomMessage>,
    room_id: RoomId,
}

impl RoomHandle {
    /// Create a new room handle
    pub fn new(sender: mpsc::Sender<RoomMessage>, room_id: RoomId) -> Self {
        Self { sender, room_id }
    }

    /// Get room ID
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Whether the actor behind this handle has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the room
    pub async fn send(&self, message: RoomMessage) -> RegistryResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RegistryError::RoomClosed(self.room_id.clone()))
    }

    /// Send a message built around a reply channel and wait for the reply
    pub async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> RoomMessage,
    ) -> RegistryResult<R> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await
            .map_err(|_| RegistryError::RoomClosed(self.room_id.clone()))
    }

    /// Ask the actor to stop. A room that's already gone is fine.
    pub async fn close(&self) {
        let _ = self.sender.send(RoomMessage::Close).await;
    }
}

/// Room actor owning a single room.
///
/// All membership changes, choices and fan-out for the room go through
/// this actor's inbox one at a time, so every broadcast sees a consistent
/// member list.
pub struct RoomActor {
    /// Room state
    room: Room,

    /// Message inbox
    inbox: mpsc::Receiver<RoomMessage>,

    /// Is room closed
    is_closed: bool,
}

impl RoomActor {
    /// Create a new room actor
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room ID
    /// * `inbox_capacity` - Size of the message inbox
    ///
    /// # Returns
    ///
    /// * `(RoomActor, RoomHandle)` - Actor and handle for sending messages
    pub fn new(room_id: RoomId, inbox_capacity: usize) -> (Self, RoomHandle) {
        let (sender, inbox) = mpsc::channel(inbox_capacity);

        let actor = Self {
            room: Room::new(room_id.clone()),
            inbox,
            is_closed: false,
        };

        (actor, RoomHandle::new(sender, room_id))
    }

    /// Run the room actor event loop
    pub async fn run(mut self) {
        log::info!("Room {} opened", self.room.id());

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        log::info!(
            "Room {} closed after {} round(s)",
            self.room.id(),
            self.room.history().len()
        );
    }

    /// Handle a room message
    fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join { player, response } => {
                let result = self.handle_join(player);
                self.reply(response, result);
            }

            RoomMessage::Leave {
                player_id,
                response,
            } => {
                let result = self.handle_leave(player_id);
                self.reply(response, result);
            }

            RoomMessage::SubmitChoice {
                player_id,
                choice,
                response,
            } => {
                let result = self.handle_choice(player_id, &choice);
                self.reply(response, result);
            }

            RoomMessage::GetState { response } => {
                let _ = response.send(self.room.snapshot());
            }

            RoomMessage::Close => {
                self.is_closed = true;
            }
        }
    }

    fn reply(&self, response: oneshot::Sender<RoomResponse>, result: RoomResponse) {
        if let Some(reason) = result.error_message() {
            log::debug!("Room {}: request refused: {}", self.room.id(), reason);
        }
        let _ = response.send(result);
    }

    /// Handle join request
    fn handle_join(&mut self, player: Player) -> RoomResponse {
        let requested = player.username().to_string();

        let (player_id, username) = match self.room.add_member(player) {
            Ok(admitted) => (admitted.id(), admitted.username().to_string()),
            Err(RoomError::Full) => {
                log::info!(
                    "Room {}: rejected {} (room full)",
                    self.room.id(),
                    requested
                );
                return RoomResponse::RoomFull;
            }
        };

        let player_count = self.room.member_count();
        log::info!(
            "Room {}: {} joined ({}/{})",
            self.room.id(),
            username,
            player_count,
            ROOM_CAPACITY
        );

        self.room.broadcast(&ServerMessage::PlayerJoined {
            username: username.clone(),
            player_count,
        });

        if player_count == ROOM_CAPACITY {
            self.room.set_phase(RoomPhase::Playing);
            self.room.broadcast(&ServerMessage::GameStart);
        }

        RoomResponse::Joined {
            player_id,
            username,
            player_count,
        }
    }

    /// Handle leave request
    fn handle_leave(&mut self, player_id: PlayerId) -> RoomResponse {
        let Some(player) = self.room.remove_member(player_id) else {
            return RoomResponse::PlayerNotFound;
        };

        let remaining = self.room.member_count();
        log::info!(
            "Room {}: {} left ({} remaining)",
            self.room.id(),
            player.username(),
            remaining
        );

        // The departed player is already out of the member list, so the
        // fan-out below never reaches its connection.
        if remaining > 0 {
            self.room
                .broadcast(&ServerMessage::player_left(player.username()));
        }

        if remaining == 1 {
            self.room.reset_round();
            self.room.set_phase(RoomPhase::Waiting);
            self.room.broadcast(&ServerMessage::WaitingForPlayer);
        }

        RoomResponse::Left { remaining }
    }

    /// Handle a submitted choice
    fn handle_choice(&mut self, player_id: PlayerId, raw: &str) -> RoomResponse {
        let choice = match raw.parse::<Choice>() {
            Ok(choice) => choice,
            Err(e) => return RoomResponse::InvalidChoice(e),
        };

        let Some(player) = self.room.find_member_mut(player_id) else {
            return RoomResponse::PlayerNotFound;
        };

        player.set_choice(choice.as_str());
        let username = player.username().to_string();
        self.room
            .send_to(player_id, ServerMessage::ChoiceMade { choice });
        log::debug!("Room {}: {} chose {}", self.room.id(), username, choice);

        if self.room.member_count() != ROOM_CAPACITY || !self.room.is_round_complete() {
            return RoomResponse::ChoiceAccepted { outcome: None };
        }

        let outcome = self.room.resolve_round();
        log::info!(
            "Room {}: round {} resolved: {:?}",
            self.room.id(),
            self.room.history().len(),
            outcome
        );
        self.room
            .broadcast(&ServerMessage::RoundResult(outcome.clone()));
        self.room.reset_round();

        RoomResponse::ChoiceAccepted {
            outcome: Some(outcome),
        }
    }
}
