//! Converter seam shared by the still and animated strategies.

use async_trait::async_trait;
use stickerkit_core::{MediaClass, MediaInput, StickerError, StickerResult};

/// Converts one media buffer into a sticker.
#[async_trait]
pub trait StickerConverter: Send + Sync {
    /// Convert `input`, already classified as `class`.
    async fn convert(
        &self,
        input: &MediaInput,
        class: MediaClass,
    ) -> Result<StickerResult, StickerError>;
}
