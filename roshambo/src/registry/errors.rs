//! Registry error types.

use thiserror::Error;

use super::config::RegistryConfigError;
use crate::game::{ChoiceError, PlayerId, RoomId};

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Join attempted on a room that already has two players
    #[error("Room {0} is full")]
    RoomFull(RoomId),

    /// No room with this id exists
    #[error("Room {0} not found")]
    RoomNotFound(RoomId),

    /// The player isn't a member of the room
    #[error("Player {player_id} not found in room {room_id}")]
    PlayerNotFound { room_id: RoomId, player_id: PlayerId },

    /// Submitted throw is outside rock, paper, scissors
    #[error(transparent)]
    InvalidChoice(#[from] ChoiceError),

    /// The room actor stopped before answering
    #[error("Room {0} is closed")]
    RoomClosed(RoomId),

    /// The room actor answered with a response that doesn't fit the request
    #[error("Unexpected response from room {room_id}: {response}")]
    UnexpectedResponse { room_id: RoomId, response: String },

    /// The registry was built with settings it can't run with
    #[error("Invalid registry configuration: {0}")]
    InvalidConfig(#[from] RegistryConfigError),
}

impl RegistryError {
    /// Text suitable for sending back over a player's connection.
    ///
    /// Player ids and internal failures aren't echoed to clients.
    pub fn client_message(&self) -> String {
        match self {
            RegistryError::RoomFull(_) => "Room is full".to_string(),
            RegistryError::RoomNotFound(_) => "Room not found".to_string(),
            RegistryError::PlayerNotFound { .. } => "Player not found".to_string(),
            RegistryError::InvalidChoice(e) => e.to_string(),
            RegistryError::RoomClosed(_) => "Room is closed".to_string(),
            RegistryError::UnexpectedResponse { .. } | RegistryError::InvalidConfig(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
