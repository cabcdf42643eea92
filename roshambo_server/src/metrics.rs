//! Prometheus metrics for monitoring room and connection activity.
//!
//! Metrics are exposed in Prometheus text format on a separate listener
//! when `METRICS_BIND` (or `--metrics-bind`) is set. Without an installed
//! exporter every call here is a no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use roshambo_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::websocket_connections_total();
//! metrics::round_resolved(true);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Arguments
///
/// - `addr`: Address to bind the metrics server to (e.g., `0.0.0.0:9090`)
///
/// # Returns
///
/// Result indicating success or error message
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// WebSocket Metrics
// ============================================================================

/// Set current active WebSocket connections count.
pub fn websocket_connections_active(count: u64) {
    metrics::gauge!("websocket_connections_active").set(count as f64);
}

/// Increment total WebSocket connections counter.
pub fn websocket_connections_total() {
    metrics::counter!("websocket_connections_total").increment(1);
}

/// Increment WebSocket messages sent counter.
pub fn websocket_messages_sent() {
    metrics::counter!("websocket_messages_sent").increment(1);
}

/// Increment WebSocket messages received counter.
pub fn websocket_messages_received() {
    metrics::counter!("websocket_messages_received").increment(1);
}

/// Increment rejected inbound frames, labelled by reason.
pub fn websocket_messages_rejected(reason: &str) {
    metrics::counter!("websocket_messages_rejected",
        "reason" => reason.to_string()
    )
    .increment(1);
}

// ============================================================================
// Room Metrics
// ============================================================================

/// Set current active rooms count.
pub fn active_rooms(count: usize) {
    metrics::gauge!("active_rooms").set(count as f64);
}

/// Increment joins turned away because the room was full.
pub fn rejected_joins_total() {
    metrics::counter!("rejected_joins_total").increment(1);
}

/// Increment resolved rounds, split by decided and failed outcomes.
pub fn round_resolved(decided: bool) {
    let outcome = if decided { "decided" } else { "failed" };
    metrics::counter!("rounds_resolved_total",
        "outcome" => outcome
    )
    .increment(1);
}
