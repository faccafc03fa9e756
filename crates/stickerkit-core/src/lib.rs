//! Stickerkit Core Library
//!
//! This crate provides the domain models, encoder constants, error taxonomy and
//! configuration shared by every stickerkit component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, LogFormat, StorageConfig};
pub use error::{LogLevel, StickerError, StickerResultExt};
pub use models::{
    generate_job_id, MediaClass, MediaInput, OffloadReceipt, StickerResult, Ttl,
};
