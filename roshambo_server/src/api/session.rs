//! Per-connection session state.
//!
//! A connection moves `connecting → joined → playing ⇄ awaiting_opponent →
//! closed`. The state is derived from what the room pushes to the
//! connection, so it never disagrees with what the client has seen.

use roshambo::ServerMessage;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SessionState {
    /// Upgraded, join not yet confirmed
    #[default]
    Connecting,
    /// Member of a room, alone
    Joined,
    /// Two members trading rounds
    Playing,
    /// Opponent left; waiting for a new one
    AwaitingOpponent,
    /// No further sends
    Closed,
}

impl SessionState {
    /// State after `message` has been delivered to this connection.
    pub fn advance(self, message: &ServerMessage) -> Self {
        match (self, message) {
            (Self::Closed, _) => Self::Closed,
            (Self::Connecting, ServerMessage::PlayerJoined { .. }) => Self::Joined,
            (_, ServerMessage::GameStart) => Self::Playing,
            (Self::Playing, ServerMessage::WaitingForPlayer) => Self::AwaitingOpponent,
            (state, _) => state,
        }
    }

    pub fn close(self) -> Self {
        Self::Closed
    }

    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Joined => "joined",
            Self::Playing => "playing",
            Self::AwaitingOpponent => "awaiting_opponent",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
