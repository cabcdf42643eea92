//! Wire protocol for room connections.
//!
//! Both directions are JSON objects discriminated by a `type` field and
//! are validated at the boundary as closed enums.

/// Client and server message types.
pub mod messages;

pub use messages::{ClientMessage, ServerMessage};
