//! Status broadcast channel
//!
//! Human-readable progress lines tagged with a severity, fanned out to whoever is
//! listening (typically a dashboard socket). This is a logging sink: nothing here
//! feeds back into the pipeline.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const STATUS_CHANNEL_CAPACITY: usize = 256;

/// Severity tag shown next to a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "")]
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
}

/// Fan-out sender for status events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct StatusBroadcaster {
    sender: broadcast::Sender<StatusEvent>,
}

impl StatusBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.sender.subscribe()
    }

    /// Log the message and publish it to current subscribers.
    pub fn emit(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        match severity {
            Severity::Error => tracing::error!(status = %message),
            Severity::Warning => tracing::warn!(status = %message),
            Severity::Success | Severity::Info => tracing::info!(status = %message),
        }

        // No subscribers is the normal case when no dashboard is attached.
        let _ = self.sender.send(StatusEvent { message, severity });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(message, Severity::Success);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.emit(message, Severity::Warning);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(message, Severity::Error);
    }
}

impl Default for StatusBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
