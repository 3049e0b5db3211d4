//! Monitoring loop: heartbeat state and the poll-render cycle.
//!
//! The `heartbeat` module tracks the blinking heart and its beat count.
//! The `cycle` module runs collect → render → push → sleep until stopped.

pub mod cycle;
pub mod heartbeat;

pub use cycle::{Monitor, MonitorState, RunOutcome, StopReason};
pub use heartbeat::Heartbeat;
