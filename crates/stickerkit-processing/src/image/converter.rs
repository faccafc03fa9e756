//! In-process still image conversion.

use async_trait::async_trait;
use image::ImageReader;
use std::io::Cursor;
use stickerkit_core::constants::{STICKER_SIZE, STILL_WEBP_QUALITY};
use stickerkit_core::{MediaClass, MediaInput, StickerError, StickerResult, StickerResultExt};

use crate::compression::encode_webp;
use crate::image::resize::ImageResize;
use crate::traits::StickerConverter;

/// Decodes any still format the `image` crate recognises, stretches it to a
/// square and re-encodes it as WebP. No temp files are involved.
#[derive(Debug, Clone, Copy)]
pub struct StillImageConverter {
    size: u32,
    quality: f32,
}

impl StillImageConverter {
    pub fn new() -> Self {
        Self {
            size: STICKER_SIZE,
            quality: STILL_WEBP_QUALITY,
        }
    }

    /// Synchronous conversion. CPU-bound; call from a blocking context.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<StickerResult, StickerError> {
        let class = MediaClass::StaticImage;

        // The declared MIME type is not trusted for the decoder choice.
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .conversion_failed(class)?
            .decode()
            .conversion_failed(class)?;

        let squared = ImageResize::stretch_square(&img, self.size);
        let webp = encode_webp(&squared, self.quality).conversion_failed(class)?;

        Ok(StickerResult::still(webp))
    }
}

impl Default for StillImageConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StickerConverter for StillImageConverter {
    async fn convert(
        &self,
        input: &MediaInput,
        class: MediaClass,
    ) -> Result<StickerResult, StickerError> {
        let converter = *self;
        let data = input.data.clone();

        tokio::task::spawn_blocking(move || converter.convert_bytes(&data))
            .await
            .map_err(|e| StickerError::conversion(class, format!("Conversion task failed: {}", e)))?
    }
}
