//! Offload client abstraction
//!
//! This module defines the `OffloadClient` trait implemented by every offload backend.

use async_trait::async_trait;
use bytes::Bytes;
use stickerkit_core::{OffloadReceipt, Ttl};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Remote offload backend.
///
/// Implementations never fail the caller: every problem is reported inside the
/// returned [`OffloadReceipt`].
#[async_trait]
pub trait OffloadClient: Send + Sync {
    /// Whether a remote endpoint is configured. An unconfigured client performs no I/O.
    fn is_configured(&self) -> bool;

    /// Upload `data` as a temporary object named `filename`.
    ///
    /// `ttl` defaults to the client's configured minutes when `None`.
    async fn offload(&self, data: Bytes, filename: &str, ttl: Option<Ttl>) -> OffloadReceipt;
}
