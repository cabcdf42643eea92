use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{
    choice::Choice,
    outcome::{ResolutionError, RoundOutcome},
    player::{Player, PlayerId, PlayerSnapshot},
};
use crate::net::messages::ServerMessage;

/// Number of players a room holds.
pub const ROOM_CAPACITY: usize = 2;

/// Caller-supplied room identifier.
pub type RoomId = String;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RoomError {
    #[error("room is full")]
    Full,
}

/// Where a room is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPhase {
    /// Fewer than two players.
    #[default]
    Waiting,
    /// Two players, rounds are being played.
    Playing,
    /// Reserved. No transition enters this phase.
    Finished,
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

/// Pick the name a joining player ends up with.
///
/// A name already taken becomes `{name}-{n}`, where `n` counts the
/// existing names that start with the requested one.
pub fn resolve_username<'a>(
    requested: &str,
    existing: impl IntoIterator<Item = &'a str> + Clone,
) -> String {
    if !existing.clone().into_iter().any(|name| name == requested) {
        return requested.to_string();
    }

    let n = existing
        .into_iter()
        .filter(|name| name.starts_with(requested))
        .count();
    format!("{requested}-{n}")
}

/// A two-player game room and its round state machine.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    members: Vec<Player>,
    phase: RoomPhase,
    history: Vec<RoundOutcome>,
}

impl Room {
    pub fn new(id: impl Into<RoomId>) -> Self {
        Self {
            id: id.into(),
            members: Vec::with_capacity(ROOM_CAPACITY),
            phase: RoomPhase::Waiting,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: RoomPhase) {
        if self.phase != phase {
            log::debug!("Room {}: {} -> {}", self.id, self.phase, phase);
        }
        self.phase = phase;
    }

    pub fn members(&self) -> &[Player] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub fn history(&self) -> &[RoundOutcome] {
        &self.history
    }

    /// Admit a player, renaming them first if their name is taken.
    ///
    /// Returns the admitted player so callers can read the final name.
    pub fn add_member(&mut self, mut player: Player) -> Result<&Player, RoomError> {
        if self.is_full() {
            return Err(RoomError::Full);
        }

        let username = resolve_username(
            player.username(),
            self.members.iter().map(Player::username),
        );
        if username != player.username() {
            log::debug!(
                "Room {}: renaming {} to {} to avoid a collision",
                self.id,
                player.username(),
                username
            );
            player.rename(username);
        }

        self.members.push(player);
        Ok(&self.members[self.members.len() - 1])
    }

    /// Remove a player by id. Absent ids are ignored.
    pub fn remove_member(&mut self, player_id: PlayerId) -> Option<Player> {
        let index = self.members.iter().position(|p| p.id() == player_id)?;
        Some(self.members.remove(index))
    }

    pub fn find_member(&self, player_id: PlayerId) -> Option<&Player> {
        self.members.iter().find(|p| p.id() == player_id)
    }

    pub fn find_member_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.members.iter_mut().find(|p| p.id() == player_id)
    }

    /// True when every current member has chosen.
    ///
    /// Vacuously true for an empty or single-member room, so callers must
    /// check the member count before resolving.
    pub fn is_round_complete(&self) -> bool {
        self.members.iter().all(Player::has_choice)
    }

    /// Decide the current round and record the outcome in the history.
    ///
    /// Failures come back as [`RoundOutcome::Failed`], never as a panic or
    /// an `Err`. Choices are left in place; see [`Room::reset_round`].
    pub fn resolve_round(&mut self) -> RoundOutcome {
        let outcome = self.decide();
        self.history.push(outcome.clone());
        outcome
    }

    fn decide(&self) -> RoundOutcome {
        let [one, two] = self.members.as_slice() else {
            return ResolutionError::NotEnoughPlayers.into();
        };

        let parse = |player: &Player| player.choice().and_then(|c| c.parse::<Choice>().ok());
        match (parse(one), parse(two)) {
            (Some(c1), Some(c2)) => {
                RoundOutcome::decide((one.username(), c1), (two.username(), c2))
            }
            _ => ResolutionError::InvalidChoice.into(),
        }
    }

    /// Clear every member's choice and put the room back into play.
    pub fn reset_round(&mut self) {
        for player in &mut self.members {
            player.clear_choice();
        }
        self.set_phase(RoomPhase::Playing);
    }

    /// Send a message to every member through their own transport.
    pub fn broadcast(&mut self, message: &ServerMessage) -> usize {
        let mut delivered = 0;
        for player in &mut self.members {
            if player.send(message.clone()) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Send a message to a single member.
    pub fn send_to(&mut self, player_id: PlayerId, message: ServerMessage) -> bool {
        self.find_member_mut(player_id)
            .is_some_and(|player| player.send(message))
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id.clone(),
            game_state: self.phase,
            players: self.members.iter().map(Player::snapshot).collect(),
            round_results: self.history.clone(),
        }
    }
}

/// Serializable view of a [`Room`] for the query surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub game_state: RoomPhase,
    pub players: Vec<PlayerSnapshot>,
    pub round_results: Vec<RoundOutcome>,
}
