//! # Roshambo
//!
//! Real-time two-player rock-paper-scissors rooms.
//!
//! Players connect to a named room; the first two get in, anyone after that
//! is turned away. Once both have thrown, the round is resolved by cyclic
//! dominance (rock beats scissors, scissors beats paper, paper beats rock),
//! the result is broadcast and the round resets.
//!
//! ## Architecture
//!
//! A room moves between two phases:
//!
//! - **Waiting**: fewer than two players
//! - **Playing**: two players trading rounds
//!
//! Each room is owned by a single actor task. The registry maps room ids to
//! actor handles, spawning rooms on first join and dropping them when the
//! last player leaves.
//!
//! ## Core Modules
//!
//! - [`game`]: players, rooms, and round resolution
//! - [`net`]: JSON wire messages
//! - [`registry`]: room actors and the registry that owns them
//!
//! ## Example
//!
//! ```
//! use roshambo::{Player, Room};
//!
//! let mut room = Room::new("r1");
//! room.add_member(Player::new(Some("alice"))).unwrap();
//! let second = room.add_member(Player::new(Some("alice"))).unwrap();
//! assert_eq!(second.username(), "alice-1");
//! ```

/// Core game state and rules.
pub mod game;
pub use game::{
    Choice, Player, PlayerId, ROOM_CAPACITY, ResolutionError, Room, RoomError, RoomId, RoomPhase,
    RoomSnapshot, RoundOutcome, Winner,
};

/// Wire protocol.
pub mod net;
pub use net::messages::{self, ClientMessage, ServerMessage};

/// Room actors and the room registry.
pub mod registry;
pub use registry::{RegistryConfig, RegistryConfigError, RegistryError, RoomRegistry};
