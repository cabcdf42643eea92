//! Registry configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default mailbox size for each room actor.
pub const DEFAULT_INBOX_CAPACITY: usize = 100;

/// Default per-connection outbound buffer.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 32;

/// Room registry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Capacity of each room actor's message inbox
    pub inbox_capacity: usize,

    /// Capacity of the channel feeding each player's connection
    pub outbound_buffer: usize,
}

/// A registry setting that can't back a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryConfigError {
    #[error("Room inbox capacity must be greater than 0")]
    ZeroInboxCapacity,

    #[error("Outbound buffer must be greater than 0")]
    ZeroOutboundBuffer,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

impl RegistryConfig {
    /// Validate configuration
    ///
    /// Both capacities size bounded tokio channels, which need room for at
    /// least one message.
    pub fn validate(&self) -> Result<(), RegistryConfigError> {
        if self.inbox_capacity == 0 {
            return Err(RegistryConfigError::ZeroInboxCapacity);
        }

        if self.outbound_buffer == 0 {
            return Err(RegistryConfigError::ZeroOutboundBuffer);
        }

        Ok(())
    }
}
