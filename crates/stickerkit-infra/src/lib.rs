//! Stickerkit Infrastructure Library
//!
//! Process-level plumbing shared by the binaries: tracing setup and the status
//! broadcast channel consumed by the operator dashboard.

pub mod status;
pub mod telemetry;

pub use status::{Severity, StatusBroadcaster, StatusEvent};
pub use telemetry::{init_telemetry, shutdown_telemetry};
