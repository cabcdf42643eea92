//! Axum server exposing roshambo rooms over WebSockets.
//!
//! The binary in `main.rs` wires these modules together; they're exposed as a
//! library so integration tests can build the router directly.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
