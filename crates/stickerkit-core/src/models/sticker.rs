use bytes::Bytes;

use crate::constants::STICKER_MIME_TYPE;

/// Sticker-ready WebP buffer. The transport must send it flagged as a sticker.
#[derive(Debug, Clone)]
pub struct StickerResult {
    pub data: Bytes,
    pub mime_type: &'static str,
    pub animated: bool,
}

impl StickerResult {
    pub fn still(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            mime_type: STICKER_MIME_TYPE,
            animated: false,
        }
    }

    pub fn animated(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            mime_type: STICKER_MIME_TYPE,
            animated: true,
        }
    }
}
