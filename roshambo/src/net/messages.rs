//! JSON messages exchanged over a room connection.

use serde::{Deserialize, Serialize};

use crate::game::{Choice, RoundOutcome};

/// Messages a client may send.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Throw for the current round. The value is kept raw here so an
    /// unknown throw can be told apart from a malformed message.
    Choice { choice: String },
}

impl ClientMessage {
    /// Parse a text frame. Unknown `type` values and missing fields are
    /// errors.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Messages the server pushes to clients.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Someone joined; sent to every member, the newcomer included.
    PlayerJoined { username: String, player_count: usize },
    /// The room just filled up.
    GameStart,
    /// Acknowledges the sender's own choice.
    ChoiceMade { choice: Choice },
    /// Both players chose.
    RoundResult(RoundOutcome),
    /// Someone disconnected.
    PlayerLeft { message: String },
    /// Sent to the member left alone in a room.
    WaitingForPlayer,
    /// Invalid input or a rejected join; only the sender sees it.
    Error { message: String },
}

impl ServerMessage {
    pub fn player_left(username: &str) -> Self {
        Self::PlayerLeft {
            message: format!("Player {username} left the game"),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Wire name of the message type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerJoined { .. } => "player_joined",
            Self::GameStart => "game_start",
            Self::ChoiceMade { .. } => "choice_made",
            Self::RoundResult(_) => "round_result",
            Self::PlayerLeft { .. } => "player_left",
            Self::WaitingForPlayer => "waiting_for_player",
            Self::Error { .. } => "error",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
