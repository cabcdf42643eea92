//! Room registry with one async actor per room.
//!
//! This module implements:
//! - RoomActor: async actor owning a single room and its members' transports
//! - RoomRegistry: owns the room-id to room mapping, creating rooms on first
//!   join and deleting them when the last member leaves
//! - Message-based communication with tokio channels
//!
//! ## Architecture
//!
//! Each room runs in a separate Tokio task with an mpsc message inbox, so
//! all reads, mutations and broadcasts for a room happen one at a time.
//! The registry's own lock covers only the id-to-handle map, held across
//! the join/leave round trip so creation and deletion stay atomic.
//!
//! ## Example
//!
//! ```no_run
//! use roshambo::registry::{RegistryConfig, RoomRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = RoomRegistry::new(RegistryConfig::default())?;
//!
//!     let (transport, mut outbound) = registry.transport();
//!     let joined = registry.add_player("r1", Some("alice"), transport).await?;
//!     registry.submit_choice("r1", joined.player_id, "rock").await?;
//!
//!     while let Ok(message) = outbound.try_recv() {
//!         println!("{}", message.to_json()?);
//!     }
//!
//!     registry.remove_player("r1", joined.player_id).await?;
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;

pub use actor::{RoomActor, RoomHandle};
pub use config::{RegistryConfig, RegistryConfigError};
pub use errors::{RegistryError, RegistryResult};
pub use manager::{JoinedRoom, RoomRegistry};
pub use messages::{RoomMessage, RoomResponse};
