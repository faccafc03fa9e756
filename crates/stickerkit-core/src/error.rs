//! Error types module
//!
//! `StickerError` is the taxonomy every pipeline layer reports in. Only
//! `ConversionFailed` ever reaches the requester (as an apology text); cleanup and
//! offload failures are absorbed by the layer that produced them and only logged.

use crate::models::MediaClass;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected outcomes like unsupported media
    Debug,
    /// Warning level - for non-fatal side-channel failures
    Warn,
    /// Error level - for failed conversions
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum StickerError {
    /// Media type the pipeline does not convert. Silently ignored, never replied to.
    #[error("Unsupported media type: {0}")]
    Unsupported(String),

    /// Malformed media, encoder launch/runtime failure, timeout or read-back failure.
    #[error("Failed to convert {class}: {reason}")]
    ConversionFailed { class: MediaClass, reason: String },

    #[error("Failed to clean up {path}: {reason}")]
    ResourceCleanupFailed { path: String, reason: String },

    #[error("Offload failed: {0}")]
    OffloadFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StickerError {
    pub fn conversion(class: MediaClass, reason: impl Into<String>) -> Self {
        StickerError::ConversionFailed {
            class,
            reason: reason.into(),
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            StickerError::Unsupported(_) => LogLevel::Debug,
            StickerError::ResourceCleanupFailed { .. } | StickerError::OffloadFailed(_) => {
                LogLevel::Warn
            }
            StickerError::ConversionFailed { .. } | StickerError::Config(_) => LogLevel::Error,
        }
    }

    /// Whether the requester should hear about this error.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, StickerError::ConversionFailed { .. })
    }

    /// Log this error at its own [`LogLevel`], prefixed with `context`.
    pub fn report(&self, context: &str) {
        match self.log_level() {
            LogLevel::Debug => tracing::debug!(error = %self, "{}", context),
            LogLevel::Warn => tracing::warn!(error = %self, "{}", context),
            LogLevel::Error => tracing::error!(error = %self, "{}", context),
        }
    }

    /// Media class the failed conversion was attempted for, if any.
    pub fn media_class(&self) -> Option<MediaClass> {
        match self {
            StickerError::ConversionFailed { class, .. } => Some(*class),
            _ => None,
        }
    }
}

/// Extension trait to turn arbitrary failures into `ConversionFailed`
pub trait StickerResultExt<T> {
    /// Map the error into a conversion failure for the given media class
    fn conversion_failed(self, class: MediaClass) -> Result<T, StickerError>;
}

impl<T, E: Into<anyhow::Error>> StickerResultExt<T> for Result<T, E> {
    fn conversion_failed(self, class: MediaClass) -> Result<T, StickerError> {
        self.map_err(|e| StickerError::conversion(class, format!("{:#}", e.into())))
    }
}
