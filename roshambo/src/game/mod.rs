//! Rock-paper-scissors game state.
//!
//! This module holds the synchronous core of the game:
//! - [`Player`]: identity, per-round choice, and outbound transport
//! - [`Room`]: two-player membership and the round state machine
//! - [`RoundOutcome`]: cyclic-dominance resolution results
//!
//! Nothing here is shared across tasks directly; see [`crate::registry`]
//! for the actor that owns each room.

pub mod choice;
pub mod outcome;
pub mod player;
pub mod room;

pub use choice::{Choice, ChoiceError};
pub use outcome::{ResolutionError, RoundOutcome, TIE, Winner};
pub use player::{Player, PlayerId, PlayerSnapshot, Transport, guest_name};
pub use room::{
    ROOM_CAPACITY, Room, RoomError, RoomId, RoomPhase, RoomSnapshot, resolve_username,
};
