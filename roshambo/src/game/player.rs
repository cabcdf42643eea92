use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::net::messages::ServerMessage;

/// Prefix for names synthesized for players who don't supply one.
pub const GUEST_PREFIX: &str = "guest-";

/// Length of the random suffix appended to [`GUEST_PREFIX`].
pub const GUEST_SUFFIX_LEN: usize = 6;

const GUEST_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Outbound channel used to push messages to a player's connection.
pub type Transport = mpsc::Sender<ServerMessage>;

/// Opaque player identifier, fixed for the life of the connection.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Synthesize a guest name like `guest-k3x9a2`.
pub fn guest_name() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..GUEST_SUFFIX_LEN)
        .map(|_| GUEST_CHARSET[rng.random_range(0..GUEST_CHARSET.len())] as char)
        .collect();
    format!("{GUEST_PREFIX}{suffix}")
}

/// A connected participant in a room.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    username: String,
    /// Raw value submitted for the current round. Validated when the
    /// round is resolved, not here.
    choice: Option<String>,
    created_at: DateTime<Utc>,
    transport: Option<Transport>,
}

impl Player {
    /// Create a player, falling back to a guest name when none (or a
    /// blank one) is requested. Any other name is kept as given.
    pub fn new(requested_name: Option<&str>) -> Self {
        let username = match requested_name {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => guest_name(),
        };

        Self {
            id: PlayerId::new(),
            username,
            choice: None,
            created_at: Utc::now(),
            transport: None,
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Only rooms rename players, and only while admitting them.
    pub(crate) fn rename(&mut self, username: String) {
        self.username = username;
    }

    pub fn choice(&self) -> Option<&str> {
        self.choice.as_deref()
    }

    pub fn has_choice(&self) -> bool {
        self.choice.is_some()
    }

    pub fn set_choice(&mut self, choice: impl Into<String>) {
        self.choice = Some(choice.into());
    }

    pub fn clear_choice(&mut self) {
        self.choice = None;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Push a message to this player without waiting.
    ///
    /// Once the connection is seen closed the handle is dropped and later
    /// sends are no-ops. A full buffer loses this message only.
    pub fn send(&mut self, message: ServerMessage) -> bool {
        let Some(transport) = &self.transport else {
            return false;
        };

        match transport.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                log::warn!(
                    "Outbound buffer full for player {} ({}), dropping {}",
                    self.username,
                    self.id,
                    dropped.kind()
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::debug!(
                    "Connection for player {} ({}) closed, releasing transport",
                    self.username,
                    self.id
                );
                self.transport = None;
                false
            }
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            uuid: self.id,
            username: self.username.clone(),
            choice: self.choice.clone(),
            timestamp: self.created_at.timestamp(),
        }
    }
}

/// Serializable view of a [`Player`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub uuid: PlayerId,
    pub username: String,
    pub choice: Option<String>,
    /// Creation time in unix seconds.
    pub timestamp: i64,
}
