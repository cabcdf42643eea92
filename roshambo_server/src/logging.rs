//! Structured logging configuration.
//!
//! The server logs through `tracing`; records emitted by the `roshambo`
//! library through the `log` facade are forwarded into the same subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,tower_http=warn,hyper=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use roshambo_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a room lifecycle event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of room event (`joined`, `left`, `round`, ...)
/// * `request_id` - Correlation id of the connection that caused it
/// * `room_id` - Room ID
/// * `username` - Optional player involved
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use roshambo_server::logging::log_room_event;
///
/// log_room_event("joined", "3f2a", "lobby", Some("alice"), "Player joined (1/2)");
/// ```
pub fn log_room_event(
    event_type: &str,
    request_id: &str,
    room_id: &str,
    username: Option<&str>,
    message: &str,
) {
    tracing::info!(
        event_type = event_type,
        request_id = request_id,
        room_id = room_id,
        username = username,
        "ROOM: {}",
        message
    );
}

/// Log a join turned away because the room was full
///
/// # Arguments
///
/// * `request_id` - Correlation id of the rejected connection
/// * `room_id` - Room ID
/// * `requested_name` - Name the client asked for, if any
pub fn log_rejected_join(request_id: &str, room_id: &str, requested_name: Option<&str>) {
    tracing::warn!(
        request_id = request_id,
        room_id = room_id,
        requested_name = requested_name,
        "Join rejected: room is full"
    );
}

/// Log a connection session state transition
///
/// # Arguments
///
/// * `request_id` - Correlation id of the connection
/// * `room_id` - Room ID
/// * `username` - Player owning the connection
/// * `from` - Previous session state
/// * `to` - New session state
pub fn log_session_transition(
    request_id: &str,
    room_id: &str,
    username: &str,
    from: &str,
    to: &str,
) {
    tracing::debug!(
        request_id = request_id,
        room_id = room_id,
        username = username,
        from = from,
        to = to,
        "Session state changed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_room_event() {
        // Just ensure it doesn't panic
        log_room_event("joined", "req-1", "r1", Some("alice"), "Test message");
        log_room_event("deleted", "req-1", "r1", None, "Room deleted");
    }

    #[test]
    fn test_log_rejected_join() {
        log_rejected_join("req-2", "r1", Some("carol"));
        log_rejected_join("req-3", "r1", None);
    }

    #[test]
    fn test_log_session_transition() {
        log_session_transition("req-1", "r1", "alice", "joined", "playing");
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
