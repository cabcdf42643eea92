//! Room registry for spawning and tearing down room actors.

use super::{
    actor::{RoomActor, RoomHandle},
    config::RegistryConfig,
    errors::{RegistryError, RegistryResult},
    messages::{RoomMessage, RoomResponse},
};
use crate::{
    game::{Player, PlayerId, RoomId, RoomSnapshot, RoundOutcome, Transport},
    net::messages::ServerMessage,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{RwLock, mpsc};

/// Receipt for a successful join
#[derive(Debug, Clone)]
pub struct JoinedRoom {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    /// Name after collision resolution
    pub username: String,
    pub player_count: usize,
}

/// Registry owning every active room.
///
/// Rooms are created on first join and removed when their last member
/// leaves. Joins and leaves hold the map's write lock across the round
/// trip to the room actor, so a room can't be deleted while a join for
/// the same id is in flight, and two joins can't create it twice.
///
/// The cost is that every other registry call waits out that round trip,
/// including `submit_choice` and `room_state` on unrelated rooms. Room
/// actors answer joins and leaves without awaiting anything, so the wait
/// is one inbox hop.
#[derive(Clone)]
pub struct RoomRegistry {
    /// Registry configuration
    config: RegistryConfig,

    /// Active room handles
    rooms: Arc<RwLock<HashMap<RoomId, RoomHandle>>>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl RoomRegistry {
    /// Create a new room registry
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either capacity is zero.
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create a transport for a new connection along with its receiving end
    pub fn transport(&self) -> (Transport, mpsc::Receiver<ServerMessage>) {
        mpsc::channel(self.config.outbound_buffer)
    }

    /// Spawn an actor task for a fresh room
    fn spawn_room(room_id: &str, inbox_capacity: usize) -> RoomHandle {
        let (actor, handle) = RoomActor::new(room_id.to_string(), inbox_capacity);
        tokio::spawn(actor.run());
        log::debug!("Spawned room {}", room_id);
        handle
    }

    /// Get a room handle, spawning the room if it doesn't exist yet
    ///
    /// A room spawned here holds no members until someone joins it; it is
    /// deleted once its last member leaves.
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room ID
    ///
    /// # Returns
    ///
    /// * `RoomHandle` - Handle to the only room registered under `room_id`
    pub async fn get_or_create(&self, room_id: &str) -> RoomHandle {
        let mut rooms = self.rooms.write().await;
        self.entry(&mut rooms, room_id)
    }

    /// Live handle for `room_id`, replacing one whose actor has stopped
    fn entry(&self, rooms: &mut HashMap<RoomId, RoomHandle>, room_id: &str) -> RoomHandle {
        if let Some(handle) = rooms.get(room_id) {
            if !handle.is_closed() {
                return handle.clone();
            }
            log::warn!("Room {} stopped unexpectedly; respawning", room_id);
        }

        let handle = Self::spawn_room(room_id, self.config.inbox_capacity);
        rooms.insert(room_id.to_string(), handle.clone());
        handle
    }

    /// Get a room handle
    pub async fn get_room(&self, room_id: &str) -> Option<RoomHandle> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).cloned()
    }

    /// Add a player to a room, creating the room if needed
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room ID
    /// * `requested_name` - Display name, or `None` for a guest name
    /// * `transport` - Channel used to push messages to the player
    ///
    /// # Returns
    ///
    /// * `RegistryResult<JoinedRoom>` - Join receipt, or `RoomFull`
    pub async fn add_player(
        &self,
        room_id: &str,
        requested_name: Option<&str>,
        transport: Transport,
    ) -> RegistryResult<JoinedRoom> {
        let mut rooms = self.rooms.write().await;
        let handle = self.entry(&mut rooms, room_id);

        let player = Player::new(requested_name).with_transport(transport);
        let response = match handle
            .request(|response| RoomMessage::Join { player, response })
            .await
        {
            Ok(response) => response,
            Err(e) => {
                rooms.remove(room_id);
                return Err(e);
            }
        };

        match response {
            RoomResponse::Joined {
                player_id,
                username,
                player_count,
            } => Ok(JoinedRoom {
                room_id: room_id.to_string(),
                player_id,
                username,
                player_count,
            }),
            RoomResponse::RoomFull => Err(RegistryError::RoomFull(room_id.to_string())),
            other => Err(RegistryError::UnexpectedResponse {
                room_id: room_id.to_string(),
                response: format!("{other:?}"),
            }),
        }
    }

    /// Remove a player from a room, deleting the room once it's empty
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room ID
    /// * `player_id` - Player ID
    ///
    /// # Returns
    ///
    /// * `RegistryResult<bool>` - Whether the room was deleted. Unknown
    ///   rooms report `false`.
    pub async fn remove_player(&self, room_id: &str, player_id: PlayerId) -> RegistryResult<bool> {
        let mut rooms = self.rooms.write().await;
        let Some(handle) = rooms.get(room_id).cloned() else {
            return Ok(false);
        };

        let response = match handle
            .request(|response| RoomMessage::Leave {
                player_id,
                response,
            })
            .await
        {
            Ok(response) => response,
            Err(e) => {
                rooms.remove(room_id);
                return Err(e);
            }
        };

        match response {
            RoomResponse::Left { remaining: 0 } => {
                rooms.remove(room_id);
                handle.close().await;
                log::info!("Room {} is empty and was deleted", room_id);
                Ok(true)
            }
            RoomResponse::Left { .. } => Ok(false),
            RoomResponse::PlayerNotFound => Err(RegistryError::PlayerNotFound {
                room_id: room_id.to_string(),
                player_id,
            }),
            other => Err(RegistryError::UnexpectedResponse {
                room_id: room_id.to_string(),
                response: format!("{other:?}"),
            }),
        }
    }

    /// Record a player's throw
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room ID
    /// * `player_id` - Player ID
    /// * `choice` - Raw submitted value
    ///
    /// # Returns
    ///
    /// * `RegistryResult<Option<RoundOutcome>>` - The round outcome if this
    ///   choice completed the round
    pub async fn submit_choice(
        &self,
        room_id: &str,
        player_id: PlayerId,
        choice: &str,
    ) -> RegistryResult<Option<RoundOutcome>> {
        let handle = self
            .get_room(room_id)
            .await
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.to_string()))?;

        let response = handle
            .request(|response| RoomMessage::SubmitChoice {
                player_id,
                choice: choice.to_string(),
                response,
            })
            .await?;

        match response {
            RoomResponse::ChoiceAccepted { outcome } => Ok(outcome),
            RoomResponse::InvalidChoice(e) => Err(e.into()),
            RoomResponse::PlayerNotFound => Err(RegistryError::PlayerNotFound {
                room_id: room_id.to_string(),
                player_id,
            }),
            other => Err(RegistryError::UnexpectedResponse {
                room_id: room_id.to_string(),
                response: format!("{other:?}"),
            }),
        }
    }

    /// Get a snapshot of one room
    ///
    /// A room whose actor stops before answering is reported as not found,
    /// the same as one already removed from the registry.
    pub async fn room_state(&self, room_id: &str) -> RegistryResult<RoomSnapshot> {
        let handle = self
            .get_room(room_id)
            .await
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.to_string()))?;

        handle
            .request(|response| RoomMessage::GetState { response })
            .await
            .map_err(|e| match e {
                RegistryError::RoomClosed(id) => RegistryError::RoomNotFound(id),
                other => other,
            })
    }

    /// List active room IDs in sorted order
    pub async fn list_rooms(&self) -> Vec<RoomId> {
        let rooms = self.rooms.read().await;
        let mut ids: Vec<RoomId> = rooms.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Get active room count
    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}
