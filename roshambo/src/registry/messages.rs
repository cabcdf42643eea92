//! Room actor message types.

use tokio::sync::oneshot;

use crate::game::{ChoiceError, Player, PlayerId, RoomSnapshot, RoundOutcome};

/// Messages that can be sent to a RoomActor
#[derive(Debug)]
pub enum RoomMessage {
    /// Admit a player and announce them to the room
    Join {
        player: Player,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Remove a player and notify whoever is left
    Leave {
        player_id: PlayerId,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Record a player's throw, resolving the round once both are in
    SubmitChoice {
        player_id: PlayerId,
        choice: String,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Get a snapshot of the room
    GetState {
        response: oneshot::Sender<RoomSnapshot>,
    },

    /// Stop the actor
    Close,
}

/// Response from room operations
#[derive(Debug, Clone, PartialEq)]
pub enum RoomResponse {
    /// Player admitted under `username`
    Joined {
        player_id: PlayerId,
        username: String,
        player_count: usize,
    },

    /// Player removed, `remaining` members left
    Left { remaining: usize },

    /// Choice stored; `outcome` is set when it completed the round
    ChoiceAccepted { outcome: Option<RoundOutcome> },

    /// Room already has two players
    RoomFull,

    /// Player isn't in this room
    PlayerNotFound,

    /// Throw outside the closed set
    InvalidChoice(ChoiceError),
}

impl RoomResponse {
    /// Get error message if response is error
    pub fn error_message(&self) -> Option<String> {
        match self {
            RoomResponse::RoomFull => Some("Room is full".to_string()),
            RoomResponse::PlayerNotFound => Some("Player not found".to_string()),
            RoomResponse::InvalidChoice(e) => Some(e.to_string()),
            RoomResponse::Joined { .. }
            | RoomResponse::Left { .. }
            | RoomResponse::ChoiceAccepted { .. } => None,
        }
    }
}
